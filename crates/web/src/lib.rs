use aggregator::AggregateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

pub use api::{ApiClient, ApiError};
pub use server::{AppState, router, run_with_listener, spawn_with_listener};
pub use session::{Flash, FlashLevel, Session};

mod api;
mod auth;
mod calendar;
mod categories;
mod dashboard;
mod server;
mod session;
mod statistics;
mod transactions;
mod views;
mod wallets;

pub enum ServerError {
    Api(ApiError),
    Aggregate(AggregateError),
}

fn status_for_api_error(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::Network(_) | ApiError::Rejected { .. } | ApiError::Invalid(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn message_for_api_error(err: ApiError) -> String {
    match err {
        ApiError::Network(err) => {
            tracing::error!("finance API unreachable: {err}");
            "the finance API is unreachable, try again later".to_string()
        }
        ApiError::Invalid(err) => format!("the finance API returned malformed data: {err}"),
        other => other.to_string(),
    }
}

fn status_for_aggregate_error(err: &AggregateError) -> StatusCode {
    match err {
        AggregateError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        AggregateError::NestingTooDeep { .. } => StatusCode::BAD_GATEWAY,
        AggregateError::Csv(_) | AggregateError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            // An expired or revoked token ends the session.
            ServerError::Api(ApiError::Unauthorized) => {
                return Redirect::to("/logout").into_response();
            }
            ServerError::Api(err) => (status_for_api_error(&err), message_for_api_error(err)),
            ServerError::Aggregate(err) => {
                let status = status_for_aggregate_error(&err);
                if status.is_server_error() {
                    tracing::error!("aggregation failed: {err}");
                }
                (status, err.to_string())
            }
        };

        (status, views::error_page(None, status.as_u16(), &message)).into_response()
    }
}

impl From<ApiError> for ServerError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<AggregateError> for ServerError {
    fn from(value: AggregateError) -> Self {
        Self::Aggregate(value)
    }
}

/// Why a form submission did not go through.
pub(crate) enum SubmitError {
    Invalid(String),
    Api(ApiError),
}

impl From<String> for SubmitError {
    fn from(value: String) -> Self {
        Self::Invalid(value)
    }
}

impl From<ApiError> for SubmitError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

/// Flashes the outcome of a form submission and redirects: to `success_to`
/// on success, back to the form otherwise.
pub(crate) fn finish_submit(
    jar: PrivateCookieJar,
    result: Result<&str, SubmitError>,
    success_to: &str,
    failure_to: &str,
) -> Response {
    let message = match result {
        Ok(message) => {
            return (Flash::success(message).push(jar), Redirect::to(success_to)).into_response();
        }
        Err(SubmitError::Api(ApiError::Unauthorized)) => {
            return Redirect::to("/logout").into_response();
        }
        Err(SubmitError::Invalid(message)) => message,
        Err(SubmitError::Api(ApiError::Rejected { message, .. })) => {
            format!("Could not save: {message}")
        }
        Err(SubmitError::Api(err)) => {
            tracing::error!("submission failed: {err}");
            format!("Could not save: {err}")
        }
    };
    (Flash::danger(message).push(jar), Redirect::to(failure_to)).into_response()
}
