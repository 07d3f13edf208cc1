use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text substituted for any field the store did not deliver.
pub const PLACEHOLDER: &str = "N/A";

/// One row of the `crypto_prices` table.
///
/// The store owns the column types, so every field is kept as the raw JSON
/// value it arrived as. Missing columns deserialize to `None`; extra columns
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Short ticker such as `BTC`.
    pub symbol: Option<Value>,
    /// Quoted price, numeric or textual.
    pub price: Option<Value>,
    /// Point in time the price refers to.
    pub timestamp: Option<Value>,
}

impl PriceRecord {
    /// Returns the symbol as display text, or the placeholder.
    pub fn symbol_text(&self) -> String {
        display_field(self.symbol.as_ref())
    }

    /// Returns the price as display text, or the placeholder.
    pub fn price_text(&self) -> String {
        display_field(self.price.as_ref())
    }

    /// Returns the timestamp as display text, or the placeholder.
    pub fn timestamp_text(&self) -> String {
        display_field(self.timestamp.as_ref())
    }
}

/// Strings render without quotes, `null` counts as absent.
fn display_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Builder for constructing `PriceRecord` instances.
///
/// # Examples
///
/// ```
/// use crypto_query::PriceRecordBuilder;
///
/// let record = PriceRecordBuilder::new()
///     .symbol("BTC")
///     .price(50000)
///     .timestamp("2024-05-01T12:00:00Z")
///     .build();
///
/// assert_eq!(record.price_text(), "50000");
/// ```
#[derive(Debug, Default)]
pub struct PriceRecordBuilder {
    symbol: Option<Value>,
    price: Option<Value>,
    timestamp: Option<Value>,
}

impl PriceRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the symbol.
    pub fn symbol(mut self, symbol: impl Into<Value>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Sets the price.
    pub fn price(mut self, price: impl Into<Value>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, timestamp: impl Into<Value>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Builds the record; unset fields stay absent.
    pub fn build(self) -> PriceRecord {
        PriceRecord {
            symbol: self.symbol,
            price: self.price,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_row_and_ignores_extra_columns() {
        let record: PriceRecord = serde_json::from_str(
            r#"{"id": 7, "symbol": "BTC", "price": 50000.5, "timestamp": "2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(record.symbol_text(), "BTC");
        assert_eq!(record.price_text(), "50000.5");
        assert_eq!(record.timestamp_text(), "2024-05-01T12:00:00Z");
    }

    #[test]
    fn missing_columns_render_as_placeholder() {
        let record: PriceRecord = serde_json::from_str(r#"{"symbol": "ETH"}"#).unwrap();

        assert_eq!(record.symbol_text(), "ETH");
        assert_eq!(record.price_text(), PLACEHOLDER);
        assert_eq!(record.timestamp_text(), PLACEHOLDER);
    }

    #[test]
    fn null_columns_render_as_placeholder() {
        let record: PriceRecord =
            serde_json::from_str(r#"{"symbol": null, "price": "3000", "timestamp": null}"#)
                .unwrap();

        assert_eq!(record.symbol_text(), PLACEHOLDER);
        assert_eq!(record.price_text(), "3000");
        assert_eq!(record.timestamp_text(), PLACEHOLDER);
    }

    #[test]
    fn builder_leaves_unset_fields_absent() {
        let record = PriceRecordBuilder::new().symbol("SOL").build();

        assert_eq!(record.symbol, Some(Value::from("SOL")));
        assert!(record.price.is_none());
        assert!(record.timestamp.is_none());
    }
}
