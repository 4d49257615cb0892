//! Dashboard: wallets, balance, searchable transaction list and the
//! expense-by-category chart.

use aggregator::{filter_transactions, sum_by_category, total_balance};
use api_types::CategoryType;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    ServerError,
    server::AppState,
    session::{Flash, Session},
    views::{self, DashboardView},
};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn show(
    session: Session,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(search): Query<SearchQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let wallets = state.api.wallets(&session.token).await?;
    let transactions = state.api.transactions(&session.token).await?;

    let expenses = sum_by_category(&transactions, CategoryType::Expense);
    let shown = filter_transactions(&transactions, &search.q);

    let (jar, flash) = Flash::take(jar);
    let page = views::dashboard_page(&DashboardView {
        username: &session.username,
        flash: flash.as_ref(),
        wallets: &wallets,
        total_balance: total_balance(&wallets),
        transactions: &shown,
        query: &search.q,
        expenses: &expenses,
    });
    Ok((jar, page))
}
