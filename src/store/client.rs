/// Supabase HTTP client implementation.
///
/// `SupabaseClient` issues synchronous PostgREST reads; `fetch_crypto_data`
/// wraps any `PriceStore` so that failures are logged and reported as "no data".
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

use crate::config::Config;
use crate::models::PriceRecord;

/// Table holding the price rows.
pub const PRICE_TABLE: &str = "crypto_prices";

/// Number of rows requested per fetch.
pub const FETCH_LIMIT: usize = 50;

/// Errors that can occur when reading from the price store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// URL or anon key was empty; raised before any request is made
    #[error("SUPABASE_URL and SUPABASE_ANON_KEY must both be set")]
    MissingCredentials,

    /// The project URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection failures, DNS resolution, timeouts
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success status returned by PostgREST
    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    /// Body was not a JSON array of rows
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Source of recent price records.
///
/// This trait is the seam used to substitute fakes in tests.
pub trait PriceStore {
    /// Returns up to `limit` records, newest first.
    fn latest_prices(&self, limit: usize) -> Result<Vec<PriceRecord>, StoreError>;
}

/// Builder for constructing `SupabaseClient` instances.
///
/// # Examples
///
/// ```
/// use crypto_query::SupabaseClientBuilder;
///
/// let client = SupabaseClientBuilder::new()
///     .url("https://project.supabase.co")
///     .anon_key("anon-key")
///     .build()
///     .expect("Failed to create client");
///
/// assert_eq!(client.url(), "https://project.supabase.co");
/// ```
#[derive(Debug, Default)]
pub struct SupabaseClientBuilder {
    url: Option<String>,
    anon_key: Option<String>,
}

impl SupabaseClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project URL (e.g., "https://project.supabase.co").
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the anon key sent with every request.
    pub fn anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// Copies URL and key from the runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .url(config.supabase_url())
            .anon_key(config.supabase_anon_key())
    }

    /// Builds the `SupabaseClient`.
    ///
    /// Fails with `StoreError::MissingCredentials` if either value is empty, and
    /// with `StoreError::InvalidUrl` if the URL does not parse.
    pub fn build(self) -> Result<SupabaseClient, StoreError> {
        let url = self.url.unwrap_or_default();
        let anon_key = self.anon_key.unwrap_or_default();

        if url.trim().is_empty() || anon_key.trim().is_empty() {
            return Err(StoreError::MissingCredentials);
        }

        let url = url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&url).map_err(|e| StoreError::InvalidUrl(format!("{url}: {e}")))?;

        // No overall timeout on the store query, only on connecting.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(StoreError::Network)?;

        Ok(SupabaseClient {
            client,
            url,
            anon_key,
        })
    }
}

/// Synchronous client for the Supabase REST interface.
pub struct SupabaseClient {
    client: reqwest::blocking::Client,
    url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Returns the project URL without a trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, PRICE_TABLE)
    }
}

impl PriceStore for SupabaseClient {
    fn latest_prices(&self, limit: usize) -> Result<Vec<PriceRecord>, StoreError> {
        let url = self.table_url();
        debug!(%url, limit, "querying price store");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("select", "*".to_string()),
                ("order", "timestamp.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .map_err(StoreError::Network)?;

        let status = response.status();
        let body = response.text().map_err(StoreError::Network)?;

        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let records: Vec<PriceRecord> = serde_json::from_str(&body).map_err(StoreError::Decode)?;
        debug!(count = records.len(), "price store returned rows");
        Ok(records)
    }
}

/// Extracts the PostgREST `message` field, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Fetches the latest `FETCH_LIMIT` records from `store`.
///
/// Any failure is logged and turned into an empty vector, so callers cannot
/// tell an unreachable store from an empty table.
pub fn fetch_crypto_data(store: &dyn PriceStore) -> Vec<PriceRecord> {
    match store.latest_prices(FETCH_LIMIT) {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Fehler beim Abrufen der Krypto-Daten");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::models::PriceRecordBuilder;

    struct FakeStore {
        result: fn() -> Result<Vec<PriceRecord>, StoreError>,
        requested_limit: Cell<Option<usize>>,
    }

    impl FakeStore {
        fn new(result: fn() -> Result<Vec<PriceRecord>, StoreError>) -> Self {
            Self {
                result,
                requested_limit: Cell::new(None),
            }
        }
    }

    impl PriceStore for FakeStore {
        fn latest_prices(&self, limit: usize) -> Result<Vec<PriceRecord>, StoreError> {
            self.requested_limit.set(Some(limit));
            (self.result)()
        }
    }

    #[test]
    fn build_rejects_empty_url() {
        let result = SupabaseClientBuilder::new().anon_key("key").build();
        assert!(matches!(result, Err(StoreError::MissingCredentials)));
    }

    #[test]
    fn build_rejects_empty_key() {
        let result = SupabaseClientBuilder::new()
            .url("https://project.supabase.co")
            .anon_key("")
            .build();
        assert!(matches!(result, Err(StoreError::MissingCredentials)));
    }

    #[test]
    fn build_rejects_unparseable_url() {
        let result = SupabaseClientBuilder::new()
            .url("not a url")
            .anon_key("key")
            .build();
        assert!(matches!(result, Err(StoreError::InvalidUrl(_))));
    }

    #[test]
    fn build_strips_trailing_slash() {
        let client = SupabaseClientBuilder::new()
            .url("https://project.supabase.co/")
            .anon_key("key")
            .build()
            .unwrap();
        assert_eq!(client.url(), "https://project.supabase.co");
        assert_eq!(
            client.table_url(),
            "https://project.supabase.co/rest/v1/crypto_prices"
        );
    }

    #[test]
    fn error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42P01","message":"relation \"crypto_prices\" does not exist"}"#;
        assert_eq!(
            error_message(body),
            "relation \"crypto_prices\" does not exist"
        );
        assert_eq!(error_message(" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn http_error_display_includes_status_and_message() {
        let err = StoreError::Http {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[test]
    fn fetch_requests_fixed_limit_and_passes_records_through() {
        let store = FakeStore::new(|| {
            Ok(vec![
                PriceRecordBuilder::new().symbol("BTC").build(),
                PriceRecordBuilder::new().symbol("ETH").build(),
            ])
        });

        let records = fetch_crypto_data(&store);

        assert_eq!(store.requested_limit.get(), Some(FETCH_LIMIT));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol_text(), "BTC");
    }

    #[test]
    fn fetch_converts_store_failure_into_empty_result() {
        let store = FakeStore::new(|| {
            Err(StoreError::Http {
                status: 500,
                message: "boom".to_string(),
            })
        });

        assert!(fetch_crypto_data(&store).is_empty());
    }

    #[test]
    fn fetch_converts_decode_failure_into_empty_result() {
        let store = FakeStore::new(|| {
            Err(StoreError::Decode(
                serde_json::from_str::<Vec<PriceRecord>>("{}").unwrap_err(),
            ))
        });

        assert!(fetch_crypto_data(&store).is_empty());
    }
}
