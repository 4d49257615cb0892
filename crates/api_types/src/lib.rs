//! Wire records exchanged with the remote finance API.
//!
//! Records are validated while they are deserialized: anything that breaks an
//! invariant of the data model is rejected with a [`RecordError`] instead of
//! being carried around half-valid.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Validation errors raised while decoding API records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("invalid transaction date \"{0}\": expected an ISO-8601 timestamp")]
    InvalidDate(String),
    #[error("transfer {0} has no target wallet")]
    MissingTargetWallet(i64),
}

/// Direction of money flow a category applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoginResponse {
        pub access_token: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Wallet {
        pub id: i64,
        pub wallet_name: String,
        pub wallet_type: String,
        pub balance: i64,
    }

    /// Wallet as embedded in a transaction record.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletSummary {
        pub id: i64,
        pub wallet_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletNew {
        pub wallet_name: String,
        pub wallet_type: String,
        pub balance: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        pub name: String,
        #[serde(rename = "type")]
        pub category_type: CategoryType,
        /// `None` for top-level categories.
        #[serde(default)]
        pub parent: Option<CategoryRef>,
    }

    impl Category {
        pub fn is_top_level(&self) -> bool {
            self.parent.is_none()
        }
    }

    /// Reference to a parent category. The API may or may not inline the name.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub id: i64,
        #[serde(default)]
        pub name: Option<String>,
    }

    /// Category as embedded in a transaction record.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategorySummary {
        pub id: i64,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub category_type: CategoryType,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub parent_id: Option<i64>,
    }
}

pub mod transaction {
    use super::{
        category::CategorySummary,
        wallet::WalletSummary,
        *,
    };

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionType {
        Income,
        Expense,
        Transfer,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "INCOME",
                Self::Expense => "EXPENSE",
                Self::Transfer => "TRANSFER",
            }
        }

        /// The category direction of this type; transfers have none.
        pub fn category_type(self) -> Option<CategoryType> {
            match self {
                Self::Income => Some(CategoryType::Income),
                Self::Expense => Some(CategoryType::Expense),
                Self::Transfer => None,
            }
        }
    }

    impl From<CategoryType> for TransactionType {
        fn from(value: CategoryType) -> Self {
            match value {
                CategoryType::Income => Self::Income,
                CategoryType::Expense => Self::Expense,
            }
        }
    }

    impl fmt::Display for TransactionType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Timestamp of a transaction.
    ///
    /// The raw string is kept as sent by the API (it is what users search
    /// for), while the calendar date is parsed up front.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct TransactionDate {
        raw: String,
        date: NaiveDate,
    }

    impl TransactionDate {
        pub fn as_str(&self) -> &str {
            &self.raw
        }

        /// Calendar day, i.e. the `YYYY-MM-DD` prefix of the timestamp.
        pub fn date(&self) -> NaiveDate {
            self.date
        }
    }

    impl TryFrom<String> for TransactionDate {
        type Error = RecordError;

        fn try_from(raw: String) -> Result<Self, Self::Error> {
            let date = raw
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
                .ok_or_else(|| RecordError::InvalidDate(raw.clone()))?;
            Ok(Self { raw, date })
        }
    }

    impl TryFrom<&str> for TransactionDate {
        type Error = RecordError;

        fn try_from(raw: &str) -> Result<Self, Self::Error> {
            Self::try_from(raw.to_string())
        }
    }

    impl From<TransactionDate> for String {
        fn from(value: TransactionDate) -> Self {
            value.raw
        }
    }

    impl fmt::Display for TransactionDate {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.raw)
        }
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RawTransaction {
        id: i64,
        amount: u64,
        transaction_type: TransactionType,
        transaction_date: TransactionDate,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        category: Option<CategorySummary>,
        wallet: WalletSummary,
        #[serde(default)]
        target_wallet: Option<WalletSummary>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", try_from = "RawTransaction")]
    pub struct Transaction {
        pub id: i64,
        /// Smallest currency unit; the sign is implied by `transaction_type`.
        pub amount: u64,
        pub transaction_type: TransactionType,
        pub transaction_date: TransactionDate,
        pub description: Option<String>,
        pub category: Option<CategorySummary>,
        pub wallet: WalletSummary,
        /// Set only for transfers.
        pub target_wallet: Option<WalletSummary>,
    }

    impl Transaction {
        pub fn category_name(&self) -> Option<&str> {
            self.category.as_ref().map(|c| c.name.as_str())
        }
    }

    impl TryFrom<RawTransaction> for Transaction {
        type Error = RecordError;

        fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
            if raw.transaction_type == TransactionType::Transfer && raw.target_wallet.is_none() {
                return Err(RecordError::MissingTargetWallet(raw.id));
            }

            Ok(Self {
                id: raw.id,
                amount: raw.amount,
                transaction_type: raw.transaction_type,
                transaction_date: raw.transaction_date,
                description: raw.description,
                category: raw.category,
                wallet: raw.wallet,
                target_wallet: raw.target_wallet,
            })
        }
    }

    /// Request body for `POST /transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub wallet_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub target_wallet_id: Option<i64>,
        pub amount: u64,
        pub description: Option<String>,
        #[serde(rename = "type")]
        pub transaction_type: TransactionType,
        /// Local timestamp as entered in the form (`YYYY-MM-DDTHH:MM`).
        pub transaction_date: String,
    }
}
