//! Turns flat lists of API records into the grouped views the front-end
//! renders.
//!
//! Every function here is pure: it borrows immutable snapshots and returns
//! newly built values, so calls may run in any order or concurrently.
//!
//! - [`flatten_categories`]: category tree in display order.
//! - [`sum_by_category`]: label → amount for chart legends.
//! - [`summarize_by_date`]: day → income/expense for the calendar.
//! - [`filter_transactions`]: free-text search.

pub use calendar::{CalendarEvent, DayTotals, calendar_events, summarize_by_date};
pub use categories::{FlatCategory, ensure_single_level, flatten_categories};
pub use error::AggregateError;
pub use export::{to_csv, write_csv};
pub use money::{Money, format_amount};
pub use search::filter_transactions;
pub use sums::{
    CategorySums, Totals, UNCATEGORIZED, sum_by_category, total_balance, totals, wallet_balances,
};

mod calendar;
mod categories;
mod error;
mod export;
mod money;
mod search;
mod sums;
