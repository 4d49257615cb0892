//! Wallet creation.

use aggregator::Money;
use api_types::wallet::WalletNew;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    finish_submit,
    server::AppState,
    session::{Flash, Session},
    views,
};

const BACK: &str = "/wallets/new";

pub async fn new_form(session: Session, jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = Flash::take(jar);
    (jar, views::wallet_form_page(&session.username, flash.as_ref()))
}

#[derive(Debug, Deserialize)]
pub struct WalletForm {
    wallet_name: String,
    wallet_type: String,
    #[serde(default)]
    balance: String,
}

impl WalletForm {
    fn into_payload(self) -> Result<WalletNew, String> {
        let wallet_name = self.wallet_name.trim().to_string();
        if wallet_name.is_empty() {
            return Err("Wallet name is required.".to_string());
        }
        let balance = if self.balance.trim().is_empty() {
            Money::ZERO
        } else {
            self.balance
                .parse::<Money>()
                .map_err(|err| err.to_string())?
        };

        Ok(WalletNew {
            wallet_name,
            wallet_type: self.wallet_type.trim().to_string(),
            balance: balance.minor(),
        })
    }
}

pub async fn create(
    session: Session,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<WalletForm>,
) -> Response {
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(message) => return finish_submit(jar, Err(message.into()), "/", BACK),
    };

    let result = state
        .api
        .create_wallet(&session.token, &payload)
        .await
        .map(|()| "Wallet created.");
    finish_submit(jar, result.map_err(Into::into), "/", BACK)
}
