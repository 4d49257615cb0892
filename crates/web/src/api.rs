//! Client for the remote finance API.
//!
//! Every authenticated call takes the bearer token of the current session as
//! an argument; the client itself holds no credentials.

use api_types::{
    CategoryType,
    auth::{LoginRequest, LoginResponse},
    category::{Category, CategoryNew},
    transaction::{Transaction, TransactionNew},
    wallet::{Wallet, WalletNew},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("not authorized")]
    Unauthorized,
    #[error("{status}: {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("malformed response: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl ApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        let message = match resp.text().await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => status
                .canonical_reason()
                .unwrap_or("server error")
                .to_string(),
        };
        tracing::warn!(%status, "API rejected request: {message}");
        Err(ApiError::Rejected { status, message })
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = Self::check(req.send().await?).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            tracing::error!("failed to decode API response: {err}");
            ApiError::Invalid(err)
        })
    }

    async fn submit<TReq: Serialize + ?Sized>(
        &self,
        token: &str,
        path: &str,
        body: &TReq,
    ) -> Result<(), ApiError> {
        let req = self.client.post(self.url(path)).bearer_auth(token).json(body);
        Self::check(req.send().await?).await?;
        Ok(())
    }

    /// Exchanges credentials for an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self.client.post(self.url("/auth/login")).json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });
        self.fetch(req).await
    }

    pub async fn wallets(&self, token: &str) -> Result<Vec<Wallet>, ApiError> {
        self.fetch(self.client.get(self.url("/wallets")).bearer_auth(token))
            .await
    }

    pub async fn transactions(&self, token: &str) -> Result<Vec<Transaction>, ApiError> {
        self.fetch(self.client.get(self.url("/transactions")).bearer_auth(token))
            .await
    }

    /// Lists categories, optionally only those of one type.
    pub async fn categories(
        &self,
        token: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>, ApiError> {
        let mut req = self.client.get(self.url("/categories")).bearer_auth(token);
        if let Some(kind) = category_type {
            req = req.query(&[("type", kind.as_str())]);
        }
        self.fetch(req).await
    }

    pub async fn create_transaction(
        &self,
        token: &str,
        payload: &TransactionNew,
    ) -> Result<(), ApiError> {
        self.submit(token, "/transactions", payload).await
    }

    pub async fn create_wallet(&self, token: &str, payload: &WalletNew) -> Result<(), ApiError> {
        self.submit(token, "/wallets", payload).await
    }

    pub async fn create_category(
        &self,
        token: &str,
        payload: &CategoryNew,
    ) -> Result<(), ApiError> {
        self.submit(token, "/categories", payload).await
    }
}
