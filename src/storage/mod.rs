mod repository;
mod transaction_store;

pub use repository::*;
pub use transaction_store::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");
