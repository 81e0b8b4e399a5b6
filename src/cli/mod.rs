use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{ChartData, LedgerService, Snapshot};
use crate::domain::{
    Breakdown, Cents, DATE_FORMAT, Totals, TransactionId, TransactionType, format_dollars,
};

/// Budget Tracker - income and expense ledger
#[derive(Parser)]
#[command(name = "budget-tracker")]
#[command(about = "Track income and expenses locally, with totals and a category breakdown")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "budget.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record an income or expense
    Add {
        /// Transaction type: income or expense
        #[arg(value_name = "TYPE")]
        transaction_type: String,

        /// Category label (e.g., "Salary", "Groceries")
        category: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction by id
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List all transactions
    List,

    /// Show totals and the per-category breakdown
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Draw a bar chart of income and expenses by category
    Chart {
        /// Width of the longest bar, in characters
        #[arg(short, long, default_value = "40")]
        width: usize,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, snapshot
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv for transactions; snapshot is always json)
        #[arg(short, long)]
        format: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Only `init` may create the database file
        let mut service = match self.command {
            Commands::Init => LedgerService::init(&self.database).await?,
            _ => LedgerService::connect(&self.database)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open database '{}'. Run `budget-tracker init` first",
                        self.database
                    )
                })?,
        };

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                transaction_type,
                category,
                amount,
                date,
            } => {
                let transaction_type: TransactionType = transaction_type.parse()?;
                let date = date.unwrap_or_else(|| today().format(DATE_FORMAT).to_string());

                let snapshot = service
                    .create_transaction(transaction_type, &category, &amount, &date)
                    .await?;

                if let Some(tx) = snapshot.transactions.last() {
                    println!(
                        "Recorded {}: {} {} on {} ({})",
                        tx.transaction_type,
                        tx.category,
                        format_amount(&tx.amount),
                        tx.date,
                        tx.id
                    );
                }
                print_totals_line(&snapshot.totals);
            }

            Commands::Delete { id } => {
                let transaction_id = TransactionId::from(id.trim());

                let existed = service.get(&transaction_id).is_some();
                let snapshot = service.delete_transaction(&transaction_id).await?;

                if existed {
                    println!("Deleted transaction: {}", transaction_id);
                } else {
                    println!("No transaction with id {}", transaction_id);
                }
                print_totals_line(&snapshot.totals);
            }

            Commands::List => {
                run_list_command(&service.snapshot());
            }

            Commands::Summary { format } => {
                let snapshot = service.snapshot();
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                    "table" => run_summary_command(&snapshot),
                    _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
                }
            }

            Commands::Chart { width } => {
                print_chart(&service.snapshot().chart(), width.max(1));
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())?;
            }
        }

        Ok(())
    }
}

fn run_list_command(snapshot: &Snapshot) {
    if snapshot.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<12} {:<8} {:<20} {:>12}  ID",
        "DATE", "TYPE", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(92));
    for tx in &snapshot.transactions {
        println!(
            "{:<12} {:<8} {:<20} {:>12}  {}",
            truncate(&tx.date, 12),
            tx.transaction_type,
            truncate(&tx.category, 20),
            format_amount(&tx.amount),
            tx.id
        );
    }
    warn_unparsed(&snapshot.totals);
}

fn run_summary_command(snapshot: &Snapshot) {
    let totals = &snapshot.totals;
    println!("Total Income:   {:>15}", format_dollars(totals.income));
    println!("Total Expenses: {:>15}", format_dollars(totals.expenses));
    println!("{}", "-".repeat(31));
    println!("Balance:        {:>15}", format_dollars(totals.balance));

    print_breakdown("Income by category:", &snapshot.breakdown.income);
    print_breakdown("Expenses by category:", &snapshot.breakdown.expense);
    warn_unparsed(totals);
}

fn print_breakdown(title: &str, breakdown: &Breakdown) {
    if breakdown.is_empty() {
        return;
    }

    let total = breakdown.total();
    println!();
    println!("{}", title);
    for entry in breakdown {
        let percentage = if total > 0 {
            entry.total as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "  {:<20} {:>12} {:>4}x ({:.1}%)",
            truncate(&entry.category, 20),
            format_dollars(entry.total),
            entry.count,
            percentage
        );
    }
}

fn print_chart(chart: &ChartData, width: usize) {
    if chart.is_empty() {
        println!("Nothing to chart yet.");
        return;
    }

    let max = chart.max_value();
    println!("# income   = expenses");
    println!();
    for (i, label) in chart.labels.iter().enumerate() {
        println!(
            "{:<20} {} {}",
            truncate(label, 20),
            bar('#', chart.income[i], max, width),
            format_dollars(chart.income[i])
        );
        println!(
            "{:<20} {} {}",
            "",
            bar('=', chart.expense[i], max, width),
            format_dollars(chart.expense[i])
        );
    }
}

/// Bar scaled against `max`; any non-zero value gets at least one cell.
fn bar(fill: char, value: Cents, max: Cents, width: usize) -> String {
    let len = if value <= 0 || max <= 0 {
        0
    } else {
        let scaled = (value as f64 / max as f64 * width as f64).round() as usize;
        scaled.clamp(1, width)
    };
    let mut out: String = std::iter::repeat_n(fill, len).collect();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match (export_type, format.unwrap_or("csv")) {
        ("transactions", "csv") => {
            let count = exporter.export_transactions_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        ("transactions", "json") => {
            let count = exporter.export_transactions_json(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        ("transactions", other) => {
            anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other);
        }
        ("snapshot", _) => {
            let snapshot = exporter.export_snapshot_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported snapshot: {} transactions, balance {}",
                    snapshot.transactions.len(),
                    format_dollars(snapshot.totals.balance)
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, snapshot",
                export_type
            );
        }
    }

    Ok(())
}

fn print_totals_line(totals: &Totals) {
    println!(
        "Income {}  Expenses {}  Balance {}",
        format_dollars(totals.income),
        format_dollars(totals.expenses),
        format_dollars(totals.balance)
    );
    warn_unparsed(totals);
}

fn warn_unparsed(totals: &Totals) {
    if totals.has_unparsed() {
        eprintln!(
            "Warning: {} stored transaction(s) have an unreadable amount and are left out of the totals",
            totals.unparsed
        );
    }
    if totals.has_overflowed() {
        eprintln!(
            "Warning: {} stored transaction(s) are too large to add and are left out of the totals",
            totals.overflowed
        );
    }
}

/// Stored amount text shown as dollars, or as-is when it doesn't parse.
fn format_amount(amount: &str) -> String {
    match crate::domain::parse_amount(amount) {
        Ok(cents) => format_dollars(cents),
        Err(_) => format!("{}?", amount),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar('#', 100, 100, 10), "##########");
        assert_eq!(bar('#', 50, 100, 10), "#####     ");
        assert_eq!(bar('#', 1, 100_000, 10), "#         ");
        assert_eq!(bar('=', 0, 100, 4), "    ");
        assert_eq!(bar('=', 5, 0, 4), "    ");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Rent", 20), "Rent");
        assert_eq!(truncate("Entertainment budget", 10), "Enterta...");
        assert_eq!(truncate("Café crème au lait", 8), "Café ...");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("12.5"), "$12.50");
        assert_eq!(format_amount("abc"), "abc?");
    }
}
