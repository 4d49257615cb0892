//! Calendar of daily income and expense.

use aggregator::{CalendarEvent, calendar_events, summarize_by_date};
use axum::{Json, extract::State, response::IntoResponse};

use crate::{ServerError, server::AppState, session::Session, views};

async fn load_events(state: &AppState, session: &Session) -> Result<Vec<CalendarEvent>, ServerError> {
    let transactions = state.api.transactions(&session.token).await?;
    Ok(calendar_events(&summarize_by_date(&transactions)))
}

pub async fn show(
    session: Session,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    let events = load_events(&state, &session).await?;
    Ok(views::calendar_page(&session.username, &events))
}

/// The same markers as JSON, for clients that fetch them lazily.
pub async fn events(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<CalendarEvent>>, ServerError> {
    Ok(Json(load_events(&state, &session).await?))
}
