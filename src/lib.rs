//! Local income and expense tracker: an in-memory ledger persisted to a
//! key-value store, with totals and per-category breakdowns.

pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

pub use application::{LedgerService, Snapshot};
pub use domain::*;
pub use storage::{Repository, TransactionStore};
