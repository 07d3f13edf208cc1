/// Supabase price store client.
///
/// This module reads the most recent rows of the `crypto_prices` table through
/// the PostgREST interface Supabase exposes, and provides the fetch boundary
/// that turns store failures into an empty result.
mod client;

pub use client::{
    FETCH_LIMIT, PRICE_TABLE, PriceStore, StoreError, SupabaseClient, SupabaseClientBuilder,
    fetch_crypto_data,
};
