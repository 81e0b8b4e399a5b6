use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::{Cents, Transaction, TransactionType, cents_to_units, serialize_units};

/// Income, expense and net totals over a set of transactions.
///
/// Serializes amounts as decimal units (`1000.0`), not cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    #[serde(serialize_with = "serialize_units")]
    pub income: Cents,
    #[serde(serialize_with = "serialize_units")]
    pub expenses: Cents,
    /// Always `income - expenses`
    #[serde(serialize_with = "serialize_units")]
    pub balance: Cents,
    /// Entries whose stored amount could not be parsed; excluded from every sum.
    pub unparsed: usize,
    /// Entries left out because adding them would overflow their sum.
    pub overflowed: usize,
}

impl Totals {
    pub fn has_unparsed(&self) -> bool {
        self.unparsed > 0
    }

    pub fn has_overflowed(&self) -> bool {
        self.overflowed > 0
    }

    /// Running sum for one transaction type.
    pub fn total_for(&self, transaction_type: TransactionType) -> Cents {
        match transaction_type {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expenses,
        }
    }
}

/// Compute totals from a list of transactions. Order does not matter.
///
/// Both sums are over non-negative amounts, so the balance itself cannot
/// overflow; an entry that would push its sum past `i64::MAX` is skipped
/// and counted in `overflowed`.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = transactions
        .iter()
        .fold(Totals::default(), |mut totals, tx| {
            let Ok(cents) = tx.amount_cents() else {
                totals.unparsed += 1;
                return totals;
            };
            let sum = match tx.transaction_type {
                TransactionType::Income => &mut totals.income,
                TransactionType::Expense => &mut totals.expenses,
            };
            match sum.checked_add(cents) {
                Some(next) => *sum = next,
                None => totals.overflowed += 1,
            }
            totals
        });
    totals.balance = totals.income - totals.expenses;
    totals
}

/// Summed amount for one category of one transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(serialize_with = "serialize_units")]
    pub total: Cents,
    pub count: usize,
}

/// Per-category sums, in the order each category first appears in the ledger.
///
/// Serializes as a JSON object mapping category label to its summed amount
/// in decimal units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    entries: Vec<CategoryTotal>,
}

impl Breakdown {
    /// Summed cents for a category, or `None` if it has no entries.
    pub fn get(&self, category: &str) -> Option<Cents> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.category.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all categories, saturating at `i64::MAX`.
    pub fn total(&self) -> Cents {
        self.entries
            .iter()
            .fold(0, |sum: Cents, entry| sum.saturating_add(entry.total))
    }

    /// Largest single category total, 0 when empty.
    pub fn max(&self) -> Cents {
        self.entries
            .iter()
            .map(|entry| entry.total)
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Breakdown {
    type Item = &'a CategoryTotal;
    type IntoIter = std::slice::Iter<'a, CategoryTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.category, &cents_to_units(entry.total))?;
        }
        map.end()
    }
}

/// Sum amounts by category for one transaction type.
/// Entries with an unparsable amount, or whose amount would overflow the
/// category sum, are left out, as in [`compute_totals`].
pub fn compute_breakdown(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Breakdown {
    let mut entries: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.transaction_type == transaction_type)
    {
        let Ok(cents) = tx.amount_cents() else {
            continue;
        };

        match index.get(tx.category.as_str()) {
            Some(&i) => {
                let Some(total) = entries[i].total.checked_add(cents) else {
                    continue;
                };
                entries[i].total = total;
                entries[i].count += 1;
            }
            None => {
                index.insert(tx.category.as_str(), entries.len());
                entries.push(CategoryTotal {
                    category: tx.category.clone(),
                    total: cents,
                    count: 1,
                });
            }
        }
    }

    Breakdown { entries }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn with_amount(mut tx: Transaction, text: &str) -> Transaction {
        tx.amount = text.to_string();
        tx
    }

    #[test]
    fn test_totals_empty() {
        let totals = compute_totals(&[]);
        assert_eq!(totals, Totals::default());
        assert!(!totals.has_unparsed());
    }

    #[test]
    fn test_totals_income_and_expense() {
        let transactions = vec![
            Transaction::income("Salary", 100000, day(1)),
            Transaction::expense("Groceries", 20000, day(2)),
        ];

        let totals = compute_totals(&transactions);
        assert_eq!(totals.income, 100000);
        assert_eq!(totals.expenses, 20000);
        assert_eq!(totals.balance, 80000);
    }

    #[test]
    fn test_balance_can_go_negative() {
        let transactions = vec![
            Transaction::income("Gift", 1000, day(1)),
            Transaction::expense("Rent", 90000, day(2)),
        ];

        let totals = compute_totals(&transactions);
        assert_eq!(totals.balance, -89000);
        assert_eq!(totals.income - totals.expenses, totals.balance);
    }

    #[test]
    fn test_totals_are_order_independent() {
        let mut transactions = vec![
            Transaction::income("Salary", 100000, day(1)),
            Transaction::expense("Groceries", 5000, day(2)),
            Transaction::expense("Dining", 3333, day(3)),
            Transaction::income("Refund", 1, day(4)),
        ];
        let forward = compute_totals(&transactions);
        transactions.reverse();
        assert_eq!(compute_totals(&transactions), forward);
    }

    #[test]
    fn test_unparsable_amount_is_counted_not_summed() {
        let transactions = vec![
            Transaction::income("Salary", 100000, day(1)),
            with_amount(Transaction::income("Bonus", 0, day(2)), "lots"),
            with_amount(Transaction::expense("Rent", 0, day(3)), "-5"),
            Transaction::expense("Groceries", 2000, day(4)),
        ];

        let totals = compute_totals(&transactions);
        assert_eq!(totals.income, 100000);
        assert_eq!(totals.expenses, 2000);
        assert_eq!(totals.balance, 98000);
        assert_eq!(totals.unparsed, 2);
        assert!(totals.has_unparsed());

        let income = compute_breakdown(&transactions, TransactionType::Income);
        assert_eq!(income.get("Bonus"), None);
        assert_eq!(income.len(), 1);
    }

    #[test]
    fn test_breakdown_groups_by_category() {
        let transactions = vec![
            Transaction::expense("Groceries", 5000, day(1)),
            Transaction::income("Salary", 100000, day(1)),
            Transaction::expense("Dining", 1200, day(2)),
            Transaction::expense("Groceries", 3000, day(3)),
        ];

        let expense = compute_breakdown(&transactions, TransactionType::Expense);
        assert_eq!(expense.get("Groceries"), Some(8000));
        assert_eq!(expense.get("Dining"), Some(1200));
        assert_eq!(expense.get("Salary"), None);
        assert_eq!(expense.total(), 9200);
        assert_eq!(expense.max(), 8000);

        // First-seen order
        let categories: Vec<&str> = expense.categories().collect();
        assert_eq!(categories, vec!["Groceries", "Dining"]);

        let groceries = expense.iter().next().unwrap();
        assert_eq!(groceries.count, 2);

        let income = compute_breakdown(&transactions, TransactionType::Income);
        assert_eq!(income.len(), 1);
        assert_eq!(income.get("Salary"), Some(100000));
    }

    #[test]
    fn test_same_category_in_both_types_stays_separate() {
        let transactions = vec![
            Transaction::income("Freelance", 50000, day(1)),
            Transaction::expense("Freelance", 7000, day(2)),
        ];

        let income = compute_breakdown(&transactions, TransactionType::Income);
        let expense = compute_breakdown(&transactions, TransactionType::Expense);
        assert_eq!(income.get("Freelance"), Some(50000));
        assert_eq!(expense.get("Freelance"), Some(7000));
    }

    #[test]
    fn test_breakdown_serializes_as_ordered_map() {
        let transactions = vec![
            Transaction::expense("Rent", 90000, day(1)),
            Transaction::expense("Coffee", 350, day(2)),
        ];

        let expense = compute_breakdown(&transactions, TransactionType::Expense);
        let json = serde_json::to_string(&expense).unwrap();
        assert_eq!(json, r#"{"Rent":900.0,"Coffee":3.5}"#);
    }

    #[test]
    fn test_totals_skip_entries_that_would_overflow() {
        let huge = i64::MAX - 10;
        let transactions = vec![
            Transaction::income("Jackpot", huge, day(1)),
            Transaction::income("Jackpot", huge, day(2)),
            Transaction::income("Interest", 5, day(3)),
            Transaction::expense("Rent", 2000, day(4)),
        ];

        let totals = compute_totals(&transactions);
        assert_eq!(totals.income, huge + 5);
        assert_eq!(totals.expenses, 2000);
        assert_eq!(totals.balance, huge + 5 - 2000);
        assert_eq!(totals.overflowed, 1);
        assert!(totals.has_overflowed());

        let income = compute_breakdown(&transactions, TransactionType::Income);
        assert_eq!(income.get("Jackpot"), Some(huge));
        assert_eq!(income.get("Interest"), Some(5));
        assert_eq!(income.total(), huge + 5);
        assert_eq!(income.iter().next().unwrap().count, 1);
    }

    #[test]
    fn test_totals_serialize_as_decimal_units() {
        let transactions = vec![
            Transaction::income("Salary", 100000, day(1)),
            Transaction::expense("Groceries", 20000, day(2)),
        ];

        let value = serde_json::to_value(compute_totals(&transactions)).unwrap();
        assert_eq!(value["income"], 1000.0);
        assert_eq!(value["expenses"], 200.0);
        assert_eq!(value["balance"], 800.0);
        assert_eq!(value["unparsed"], 0);
    }
}
