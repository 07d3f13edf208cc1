//! Renders price records into the context block handed to the model.

use crate::models::PriceRecord;

/// Returned instead of a context block when there are no records.
pub const NO_DATA_CONTEXT: &str = "Keine Krypto-Daten verfügbar.";

/// First line of every non-empty context block.
pub const CONTEXT_HEADER: &str = "Aktuelle Kryptokurse:";

/// Formats records as a human-readable context block.
///
/// Records are rendered in the order given, one line each, below a single
/// header line. Missing fields are replaced by `N/A` individually.
///
/// # Examples
///
/// ```
/// use crypto_query::{PriceRecordBuilder, format_crypto_context};
///
/// let records = vec![PriceRecordBuilder::new().symbol("BTC").price(50000).build()];
/// let context = format_crypto_context(&records);
///
/// assert!(context.contains("- BTC: $50000 (Stand: N/A)"));
/// ```
pub fn format_crypto_context(records: &[PriceRecord]) -> String {
    if records.is_empty() {
        return NO_DATA_CONTEXT.to_string();
    }

    let mut context = format!("{CONTEXT_HEADER}\n");
    for record in records {
        context.push_str(&format_record_line(record));
        context.push('\n');
    }
    context
}

fn format_record_line(record: &PriceRecord) -> String {
    format!(
        "- {}: ${} (Stand: {})",
        record.symbol_text(),
        record.price_text(),
        record.timestamp_text()
    )
}
