use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{
    DATE_FORMAT, Totals, Transaction, TransactionId, TransactionType, compute_totals,
    parse_amount,
};
use crate::storage::{Repository, TransactionStore};

use super::{AppError, CategoryBreakdown, Snapshot};

/// The ledger: the session's transactions, held in memory in insertion order
/// and written back to the store after every change.
///
/// This is the only interface a front end needs. It owns one instance and
/// routes every command through it.
pub struct LedgerService {
    store: TransactionStore,
    transactions: Vec<Transaction>,
}

impl LedgerService {
    /// Load the ledger from `store`. Missing or unreadable stored data gives
    /// an empty ledger.
    pub async fn open(store: TransactionStore) -> Result<Self, AppError> {
        let transactions = store.load().await?;
        info!(count = transactions.len(), "ledger opened");
        Ok(Self {
            store,
            transactions,
        })
    }

    /// Open the ledger in a database file, creating and migrating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Self::open(TransactionStore::new(repo)).await
    }

    /// Open the ledger in an existing, already initialized database file.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Self::open(TransactionStore::new(repo)).await
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    // ========================
    // Ledger operations
    // ========================

    /// Append a transaction and persist the ledger.
    pub async fn add(&mut self, transaction: Transaction) -> Result<(), AppError> {
        if self.get(&transaction.id).is_some() {
            return Err(AppError::DuplicateTransaction(transaction.id));
        }

        info!(
            id = %transaction.id,
            kind = %transaction.transaction_type,
            category = %transaction.category,
            amount = %transaction.amount,
            "transaction added"
        );
        self.transactions.push(transaction);
        self.persist().await
    }

    /// Remove every transaction with `id` and persist the ledger.
    /// Removing an unknown id changes nothing. Returns whether anything was removed.
    pub async fn remove(&mut self, id: &TransactionId) -> Result<bool, AppError> {
        let before = self.transactions.len();
        self.transactions.retain(|tx| &tx.id != id);
        let removed = self.transactions.len() != before;

        if removed {
            info!(%id, "transaction removed");
        } else {
            debug!(%id, "no transaction to remove");
        }
        self.persist().await?;
        Ok(removed)
    }

    async fn persist(&self) -> Result<(), AppError> {
        self.store.save(&self.transactions).await?;
        Ok(())
    }

    // ========================
    // Commands
    // ========================

    /// Record a new transaction from user input and return the updated view.
    ///
    /// `amount` must be a non-negative decimal with at most two decimal
    /// places; `date` must be `YYYY-MM-DD`. An amount that would push the
    /// running total for its type past the representable range is refused.
    pub async fn create_transaction(
        &mut self,
        transaction_type: TransactionType,
        category: &str,
        amount: &str,
        date: &str,
    ) -> Result<Snapshot, AppError> {
        let amount_cents = parse_amount(amount).map_err(|reason| AppError::InvalidAmount {
            input: amount.to_string(),
            reason,
        })?;
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| AppError::InvalidDate(date.to_string()))?;

        if self
            .totals()
            .total_for(transaction_type)
            .checked_add(amount_cents)
            .is_none()
        {
            return Err(AppError::TotalOutOfRange {
                transaction_type,
                amount: amount.trim().to_string(),
            });
        }

        let transaction = Transaction::new(transaction_type, category, amount_cents, date);
        self.add(transaction).await?;
        Ok(self.snapshot())
    }

    /// Delete a transaction by id and return the updated view.
    pub async fn delete_transaction(&mut self, id: &TransactionId) -> Result<Snapshot, AppError> {
        self.remove(id).await?;
        Ok(self.snapshot())
    }

    // ========================
    // Read model
    // ========================

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| &tx.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.transactions)
    }

    pub fn breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown::from_transactions(&self.transactions)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_transactions(&self.transactions)
    }
}
