//! Transaction form and CSV export.

use aggregator::{Money, ensure_single_level, filter_transactions, flatten_categories, to_csv};
use api_types::transaction::{TransactionNew, TransactionType};
use axum::{
    Form,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;

use crate::{
    ServerError,
    dashboard::SearchQuery,
    finish_submit,
    server::AppState,
    session::{Flash, Session},
    views::{self, TransactionFormView},
};

const FORM_DATE: &str = "%Y-%m-%dT%H:%M";
const API_DATE: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    #[serde(default = "default_mode")]
    mode: TransactionType,
}

fn default_mode() -> TransactionType {
    TransactionType::Expense
}

pub async fn new_form(
    session: Session,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(query): Query<ModeQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let wallets = state.api.wallets(&session.token).await?;
    let categories = match query.mode.category_type() {
        Some(kind) => {
            let categories = state.api.categories(&session.token, Some(kind)).await?;
            ensure_single_level(&categories)?;
            flatten_categories(&categories)
        }
        None => Vec::new(),
    };

    let now = Local::now().format(FORM_DATE).to_string();
    let (jar, flash) = Flash::take(jar);
    let page = views::transaction_form_page(&TransactionFormView {
        username: &session.username,
        flash: flash.as_ref(),
        mode: query.mode,
        wallets: &wallets,
        categories: &categories,
        now: &now,
    });
    Ok((jar, page))
}

#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    wallet_id: i64,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    target_wallet_id: Option<String>,
    amount: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transaction_date: String,
}

/// Empty select values mean "none".
fn optional_id(field: &str, value: Option<&str>) -> Result<Option<i64>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {field}.")),
    }
}

fn parse_form_date(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, FORM_DATE)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, API_DATE))
        .map_err(|_| format!("Invalid date \"{raw}\"."))
}

impl TransactionForm {
    fn into_payload(self) -> Result<TransactionNew, String> {
        let amount = self
            .amount
            .parse::<Money>()
            .and_then(Money::to_unsigned)
            .map_err(|err| err.to_string())?;
        if amount == 0 {
            return Err("Amount must be greater than zero.".to_string());
        }

        let is_transfer = self.transaction_type == TransactionType::Transfer;
        let target_wallet_id = optional_id("target wallet", self.target_wallet_id.as_deref())?;
        let category_id = optional_id("category", self.category_id.as_deref())?;
        let (category_id, target_wallet_id) = if is_transfer {
            match target_wallet_id {
                None => return Err("A transfer needs a target wallet.".to_string()),
                Some(target) if target == self.wallet_id => {
                    return Err("Source and target wallet must differ.".to_string());
                }
                Some(target) => (None, Some(target)),
            }
        } else {
            (category_id, None)
        };

        let date = parse_form_date(&self.transaction_date)?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(TransactionNew {
            wallet_id: self.wallet_id,
            category_id,
            target_wallet_id,
            amount,
            description,
            transaction_type: self.transaction_type,
            transaction_date: date.format(API_DATE).to_string(),
        })
    }
}

pub async fn create(
    session: Session,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<TransactionForm>,
) -> Response {
    let back = format!("/transactions/new?mode={}", form.transaction_type);
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(message) => return finish_submit(jar, Err(message.into()), "/", &back),
    };

    let result = state
        .api
        .create_transaction(&session.token, &payload)
        .await
        .map(|()| "Transaction saved.");
    finish_submit(jar, result.map_err(Into::into), "/", &back)
}

pub async fn export(
    session: Session,
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let transactions = state.api.transactions(&session.token).await?;
    let csv = to_csv(filter_transactions(&transactions, &search.q))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}
