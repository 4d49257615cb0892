//! Errors raised by the aggregator.
//!
//! The aggregations themselves are total functions. Errors only come from
//! parsing user input ([`InvalidAmount`]), from the category nesting check
//! ([`NestingTooDeep`]) and from the CSV writer ([`Csv`]).
//!
//!  [`InvalidAmount`]: AggregateError::InvalidAmount
//!  [`NestingTooDeep`]: AggregateError::NestingTooDeep
//!  [`Csv`]: AggregateError::Csv
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("category \"{name}\" ({id}) is nested more than one level deep")]
    NestingTooDeep { id: i64, name: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartialEq for AggregateError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::NestingTooDeep { id: a, name: na },
                Self::NestingTooDeep { id: b, name: nb },
            ) => a == b && na == nb,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
