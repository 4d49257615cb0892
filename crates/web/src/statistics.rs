//! Statistics page

use aggregator::{sum_by_category, totals, wallet_balances};
use api_types::CategoryType;
use axum::{extract::State, response::IntoResponse};

use crate::{
    ServerError,
    server::AppState,
    session::Session,
    views::{self, StatisticsView},
};

/// Income vs expense, per-category breakdowns and wallet balances.
pub async fn show(
    session: Session,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    let transactions = state.api.transactions(&session.token).await?;
    let wallets = state.api.wallets(&session.token).await?;

    let income = sum_by_category(&transactions, CategoryType::Income);
    let expenses = sum_by_category(&transactions, CategoryType::Expense);
    let (wallet_labels, wallet_data) = wallet_balances(&wallets);

    Ok(views::statistics_page(&StatisticsView {
        username: &session.username,
        totals: totals(&transactions),
        income: &income,
        expenses: &expenses,
        wallet_labels: &wallet_labels,
        wallet_data: &wallet_data,
    }))
}
