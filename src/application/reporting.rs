use serde::Serialize;

use crate::domain::{
    Breakdown, Cents, Totals, Transaction, TransactionType, compute_breakdown, compute_totals,
    serialize_units_seq,
};

/// Everything a front end needs to render the ledger after a change.
///
/// Serialized amounts in totals, breakdowns and chart series are decimal
/// units (`1000.0`); transaction amounts stay as their stored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// In insertion order
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
    pub breakdown: CategoryBreakdown,
}

impl Snapshot {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            transactions: transactions.to_vec(),
            totals: compute_totals(transactions),
            breakdown: CategoryBreakdown::from_transactions(transactions),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn chart(&self) -> ChartData {
        ChartData::from_breakdown(&self.breakdown)
    }
}

/// Category sums, computed separately for income and expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub income: Breakdown,
    pub expense: Breakdown,
}

impl CategoryBreakdown {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            income: compute_breakdown(transactions, TransactionType::Income),
            expense: compute_breakdown(transactions, TransactionType::Expense),
        }
    }
}

/// Grouped bar chart: one label per category, an income bar and an expense
/// bar for each. Income categories come first, then expense-only ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    #[serde(serialize_with = "serialize_units_seq")]
    pub income: Vec<Cents>,
    #[serde(serialize_with = "serialize_units_seq")]
    pub expense: Vec<Cents>,
}

impl ChartData {
    pub fn from_breakdown(breakdown: &CategoryBreakdown) -> Self {
        let mut labels: Vec<String> = breakdown.income.categories().map(String::from).collect();
        for category in breakdown.expense.categories() {
            if breakdown.income.get(category).is_none() {
                labels.push(category.to_string());
            }
        }

        let series = |b: &Breakdown| -> Vec<Cents> {
            labels
                .iter()
                .map(|label| b.get(label).unwrap_or(0))
                .collect()
        };
        let income = series(&breakdown.income);
        let expense = series(&breakdown.expense);

        Self {
            labels,
            income,
            expense,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Tallest bar across both series.
    pub fn max_value(&self) -> Cents {
        self.income
            .iter()
            .chain(self.expense.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}
