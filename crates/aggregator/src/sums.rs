//! Per-category and overall sums.

use std::collections::HashMap;

use api_types::{
    CategoryType,
    transaction::{Transaction, TransactionType},
    wallet::Wallet,
};
use serde::Serialize;

/// Label used for transactions without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category label → summed amount, iterated in first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategorySums {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CategorySums {
    fn add(&mut self, label: &str, amount: u64) {
        match self.index.get(label) {
            Some(&i) => {
                let slot = &mut self.entries[i].1;
                *slot = slot.saturating_add(amount);
            }
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), amount));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.index.get(label).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(label, amount)| (label.as_str(), *amount))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<u64> {
        self.entries.iter().map(|(_, amount)| *amount).collect()
    }

    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, amount)| acc.saturating_add(*amount))
    }
}

/// Sums the amounts of transactions of `kind` per category name.
///
/// Transfers never match; uncategorized transactions are grouped under
/// [`UNCATEGORIZED`].
pub fn sum_by_category(transactions: &[Transaction], kind: CategoryType) -> CategorySums {
    let wanted = TransactionType::from(kind);
    let mut sums = CategorySums::default();
    for tx in transactions.iter().filter(|tx| tx.transaction_type == wanted) {
        sums.add(tx.category_name().unwrap_or(UNCATEGORIZED), tx.amount);
    }
    sums
}

/// Income and expense totals. Transfers count toward neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: u64,
    pub expense: u64,
}

impl Totals {
    pub(crate) fn add(&mut self, kind: TransactionType, amount: u64) {
        match kind {
            TransactionType::Income => self.income = self.income.saturating_add(amount),
            TransactionType::Expense => self.expense = self.expense.saturating_add(amount),
            TransactionType::Transfer => {}
        }
    }

    /// Income minus expense.
    pub fn net(&self) -> i128 {
        i128::from(self.income) - i128::from(self.expense)
    }
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions.iter().fold(Totals::default(), |mut acc, tx| {
        acc.add(tx.transaction_type, tx.amount);
        acc
    })
}

/// Sum of all wallet balances.
pub fn total_balance(wallets: &[Wallet]) -> i64 {
    wallets
        .iter()
        .fold(0i64, |acc, w| acc.saturating_add(w.balance))
}

/// Wallet names and balances as parallel chart series.
pub fn wallet_balances(wallets: &[Wallet]) -> (Vec<String>, Vec<i64>) {
    wallets
        .iter()
        .map(|w| (w.wallet_name.clone(), w.balance))
        .unzip()
}
