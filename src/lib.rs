pub mod answerer;
pub mod config;
pub mod context;
pub mod llama;
pub mod models;
pub mod pipeline;
pub mod store;

pub use answerer::{Answer, CryptoAnswerer, CryptoAnswererBuilder, build_prompt};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use context::format_crypto_context;
pub use llama::{LlamaClient, LlamaClientBuilder, LlamaClientTrait, LlamaError};
pub use models::{PriceRecord, PriceRecordBuilder};
pub use pipeline::{Pipeline, RunOutcome};
pub use store::{PriceStore, StoreError, SupabaseClient, SupabaseClientBuilder, fetch_crypto_data};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_builds_from_config_without_network() {
        let config = ConfigBuilder::new()
            .supabase_url("https://project.supabase.co")
            .supabase_anon_key("anon-key")
            .build()
            .unwrap();

        assert!(Pipeline::from_config(&config).is_ok());
    }

    #[test]
    fn pipeline_rejects_invalid_llama_url() {
        let config = ConfigBuilder::new()
            .supabase_url("https://project.supabase.co")
            .supabase_anon_key("anon-key")
            .build()
            .unwrap()
            .with_llama_url("not-a-url");

        let err = Pipeline::from_config(&config).err().unwrap();
        assert!(err.downcast_ref::<LlamaError>().is_some());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let record = PriceRecordBuilder::new().symbol("BTC").build();
        let context = format_crypto_context(&[record]);
        assert!(context.contains("BTC"));

        let prompt = build_prompt("q", &context);
        assert!(prompt.contains("Frage: q"));
    }
}
