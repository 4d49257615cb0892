use axum::{
    Router,
    extract::FromRef,
    routing::get,
};
use axum_extra::extract::cookie::Key;

use crate::{
    api::ApiClient, auth, calendar, categories, dashboard, statistics, transactions, wallets,
};

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    /// Encrypts the session and flash cookies.
    pub key: Key,
}

impl AppState {
    pub fn new(api: ApiClient, key: Key) -> Self {
        Self { api, key }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::show))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route(
            "/transactions/new",
            get(transactions::new_form).post(transactions::create),
        )
        .route("/transactions/export", get(transactions::export))
        .route("/wallets/new", get(wallets::new_form).post(wallets::create))
        .route(
            "/categories/new",
            get(categories::new_form).post(categories::create),
        )
        .route("/calendar", get(calendar::show))
        .route("/calendar/events", get(calendar::events))
        .route("/statistics", get(statistics::show))
        .with_state(state)
}

pub async fn run_with_listener(
    state: AppState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(
        "Front-end listening on {}, API at {}",
        addr,
        state.api.base_url()
    );

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: AppState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("front-end failed: {err}");
        }
    });

    Ok(addr)
}
