use std::collections::HashSet;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Transaction;

use super::Repository;

/// Key under which the ledger is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Persists the whole ledger as one JSON array under a single key.
///
/// Every save rewrites the full list. Loading never fails because of what
/// is stored: a missing key or unreadable contents give an empty ledger.
/// Errors from the store itself are still returned.
pub struct TransactionStore {
    repo: Repository,
    key: String,
}

impl TransactionStore {
    pub fn new(repo: Repository) -> Self {
        Self::with_key(repo, TRANSACTIONS_KEY)
    }

    pub fn with_key(repo: Repository, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Overwrite the stored ledger with `transactions`.
    pub async fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let encoded = encode_transactions(transactions)?;
        self.repo.set_item(&self.key, &encoded).await?;
        debug!(key = %self.key, count = transactions.len(), "saved transactions");
        Ok(())
    }

    /// Read the stored ledger.
    pub async fn load(&self) -> Result<Vec<Transaction>> {
        let Some(text) = self.repo.get_item(&self.key).await? else {
            debug!(key = %self.key, "no stored transactions");
            return Ok(Vec::new());
        };

        let transactions = decode_transactions(&text);
        debug!(key = %self.key, count = transactions.len(), "loaded transactions");
        Ok(transactions)
    }
}

/// Encode transactions as a JSON array, preserving order.
pub fn encode_transactions(transactions: &[Transaction]) -> Result<String> {
    serde_json::to_string(transactions).context("Failed to encode transactions")
}

/// Decode a stored JSON array of transactions.
///
/// Text that is not JSON, `null`, or anything other than an array decodes to
/// an empty list. Inside an array, elements that don't decode are skipped and
/// a repeated id keeps its first occurrence.
pub fn decode_transactions(text: &str) -> Vec<Transaction> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "stored transactions are not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => {
            warn!(
                kind = json_kind(&other),
                "stored transactions are not a JSON array, starting empty"
            );
            return Vec::new();
        }
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut transactions = Vec::with_capacity(items.len());

    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(item) {
            Ok(tx) if seen.insert(tx.id.clone()) => transactions.push(tx),
            Ok(tx) => warn!(id = %tx.id, position, "skipping transaction with duplicate id"),
            Err(err) => warn!(position, error = %err, "skipping malformed transaction"),
        }
    }

    transactions
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
