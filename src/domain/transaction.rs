use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{AmountError, Cents, format_cents, parse_amount};

/// Opaque transaction identifier.
///
/// New transactions get a random v4 UUID, but stored data may carry ids in
/// any text form; they are compared as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Date format for new transactions.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, refunds, gifts)
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ParseTransactionTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransactionTypeError(pub String);

impl fmt::Display for ParseTransactionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown transaction type '{}' (expected income or expense)",
            self.0
        )
    }
}

impl std::error::Error for ParseTransactionTypeError {}

/// A single income or expense record.
///
/// The amount and date are kept as text, exactly as persisted. The amount is
/// only parsed into cents when totals are computed; the date is never
/// interpreted after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub category: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: String,
    /// `YYYY-MM-DD` for transactions created here
    pub date: String,
}

impl Transaction {
    /// Create a transaction with a freshly generated id.
    pub fn new(
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount_cents: Cents,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            transaction_type,
            category: category.into(),
            amount: format_cents(amount_cents),
            date: date.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn income(category: impl Into<String>, amount_cents: Cents, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, category, amount_cents, date)
    }

    pub fn expense(category: impl Into<String>, amount_cents: Cents, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, category, amount_cents, date)
    }

    /// Parse the stored amount text into cents.
    pub fn amount_cents(&self) -> Result<Cents, AmountError> {
        parse_amount(&self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// Amounts are written as strings, but older or hand-edited data may carry
/// plain JSON numbers. Both are kept as text.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(text) => text,
        RawAmount::Number(number) => number.to_string(),
    })
}
