use anyhow::Result;
use std::io::Write;

use crate::application::{LedgerService, Snapshot};

/// CSV column order
pub const CSV_HEADER: [&str; 5] = ["id", "date", "type", "category", "amount"];

/// Exporter for writing ledger data to CSV or JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV, in ledger order
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;

        let mut count = 0;
        for tx in self.service.transactions() {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.date.clone(),
                tx.transaction_type.as_str().to_string(),
                tx.category.clone(),
                tx.amount.clone(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export transactions as a JSON array, the same encoding the store uses
    pub fn export_transactions_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let transactions = self.service.transactions();
        serde_json::to_writer_pretty(&mut writer, transactions)?;
        writeln!(writer)?;
        Ok(transactions.len())
    }

    /// Export the full read model (transactions, totals, breakdowns) as JSON
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<Snapshot> {
        let snapshot = self.service.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
