use thiserror::Error;

use crate::domain::{AmountError, ParseTransactionTypeError, TransactionId, TransactionType};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: AmountError },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(#[from] ParseTransactionTypeError),

    #[error("Amount '{amount}' would push total {transaction_type} past the supported range")]
    TotalOutOfRange {
        transaction_type: TransactionType,
        amount: String,
    },

    #[error("Transaction already exists: {0}")]
    DuplicateTransaction(TransactionId),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
