//! Free-text transaction search.

use api_types::transaction::Transaction;

/// Keeps the transactions whose description, category name, amount or raw
/// date contains `query`, ignoring case.
///
/// A blank query keeps everything. Otherwise the query is matched as given,
/// surrounding spaces included. Input order is preserved.
pub fn filter_transactions<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    if query.trim().is_empty() {
        return transactions.iter().collect();
    }
    let needle = query.to_lowercase();

    transactions
        .iter()
        .filter(|tx| matches(tx, &needle))
        .collect()
}

fn matches(tx: &Transaction, needle: &str) -> bool {
    let description = tx.description.as_deref().unwrap_or_default();
    let category = tx.category_name().unwrap_or_default();

    description.to_lowercase().contains(needle)
        || category.to_lowercase().contains(needle)
        || tx.amount.to_string().contains(needle)
        || tx.transaction_date.as_str().to_lowercase().contains(needle)
}
