//! CSV export of transaction lists.

use std::io::Write;

use api_types::transaction::Transaction;
use csv::WriterBuilder;
use serde::Serialize;

use crate::AggregateError;

#[derive(Serialize)]
struct ExportRow<'a> {
    date: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    category: Option<&'a str>,
    description: Option<&'a str>,
    wallet: &'a str,
    target_wallet: Option<&'a str>,
    amount: u64,
}

impl<'a> From<&'a Transaction> for ExportRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            date: tx.transaction_date.as_str(),
            kind: tx.transaction_type.as_str(),
            category: tx.category_name(),
            description: tx.description.as_deref(),
            wallet: &tx.wallet.wallet_name,
            target_wallet: tx.target_wallet.as_ref().map(|w| w.wallet_name.as_str()),
            amount: tx.amount,
        }
    }
}

/// Writes `transactions` as CSV with a header row.
pub fn write_csv<'a, I, W>(transactions: I, out: W) -> Result<(), AggregateError>
where
    I: IntoIterator<Item = &'a Transaction>,
    W: Write,
{
    // Header is written by hand so an empty export still carries it.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record([
        "date",
        "type",
        "category",
        "description",
        "wallet",
        "target_wallet",
        "amount",
    ])?;
    for tx in transactions {
        writer.serialize(ExportRow::from(tx))?;
    }
    writer.flush()?;
    Ok(())
}

/// Same as [`write_csv`], into a fresh buffer.
pub fn to_csv<'a, I>(transactions: I) -> Result<Vec<u8>, AggregateError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buffer = Vec::new();
    write_csv(transactions, &mut buffer)?;
    Ok(buffer)
}
