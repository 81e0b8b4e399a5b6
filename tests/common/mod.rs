// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use budget_tracker::application::LedgerService;
use budget_tracker::storage::Repository;
use tempfile::TempDir;

/// Test database living in its own temporary directory
pub struct TestDb {
    pub dir: TempDir,
    pub path: String,
}

impl TestDb {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("test.db").to_string_lossy().into_owned();
        Ok(Self { dir, path })
    }

    /// Open (creating if needed) the ledger in this database
    pub async fn open(&self) -> Result<LedgerService> {
        Ok(LedgerService::init(&self.path).await?)
    }

    /// Raw key-value access to the same database
    pub async fn repository(&self) -> Result<Repository> {
        Repository::init(&format!("sqlite:{}?mode=rwc", self.path)).await
    }
}

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TestDb)> {
    let db = TestDb::new()?;
    let service = db.open().await?;
    Ok((service, db))
}
