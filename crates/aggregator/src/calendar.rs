//! Per-day summaries for the calendar view.

use std::collections::BTreeMap;

use api_types::transaction::{Transaction, TransactionType};
use chrono::NaiveDate;
use serde::Serialize;

use crate::{money::format_amount, sums::Totals};

pub const INCOME_COLOR: &str = "#198754";
pub const EXPENSE_COLOR: &str = "#dc3545";

/// Income and expense of one calendar day.
pub type DayTotals = Totals;

/// Groups income and expense totals by calendar day.
///
/// Only income and expense create a day entry, so every returned day has at
/// least one non-zero total unless its transactions all have amount 0.
pub fn summarize_by_date(transactions: &[Transaction]) -> BTreeMap<NaiveDate, DayTotals> {
    let mut summary: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.transaction_type != TransactionType::Transfer)
    {
        summary
            .entry(tx.transaction_date.date())
            .or_default()
            .add(tx.transaction_type, tx.amount);
    }
    summary
}

/// One marker on the calendar, in the shape FullCalendar consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    /// `YYYY-MM-DD`
    pub start: String,
    pub color: &'static str,
    pub text_color: &'static str,
}

impl CalendarEvent {
    fn new(day: NaiveDate, sign: char, amount: u64, color: &'static str) -> Self {
        Self {
            title: format!("{sign} {}", format_amount(amount)),
            start: day.format("%Y-%m-%d").to_string(),
            color,
            text_color: "white",
        }
    }
}

/// Turns a day summary into markers: one positive marker for days with
/// income, one negative marker for days with expense.
pub fn calendar_events(summary: &BTreeMap<NaiveDate, DayTotals>) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for (day, totals) in summary {
        if totals.income > 0 {
            events.push(CalendarEvent::new(*day, '+', totals.income, INCOME_COLOR));
        }
        if totals.expense > 0 {
            events.push(CalendarEvent::new(*day, '-', totals.expense, EXPENSE_COLOR));
        }
    }
    events
}
