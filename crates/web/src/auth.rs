//! Login and logout.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    api::ApiError,
    server::AppState,
    session::{Flash, Session},
    views,
};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login_form(jar: PrivateCookieJar) -> Response {
    if Session::from_jar(&jar).is_some() {
        return Redirect::to("/").into_response();
    }
    let (jar, flash) = Flash::take(jar);
    (jar, views::login_page(flash.as_ref())).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let flash = match state.api.login(&form.username, &form.password).await {
        Ok(res) => {
            tracing::info!("user {} signed in", form.username);
            let jar = Session {
                token: res.access_token,
                username: form.username,
            }
            .store(jar);
            return (jar, Redirect::to("/")).into_response();
        }
        Err(ApiError::Unauthorized | ApiError::Rejected { .. }) => {
            tracing::info!("login refused for {}", form.username);
            Flash::danger("Login failed: wrong username or password.")
        }
        Err(err) => {
            tracing::error!("login request failed: {err}");
            Flash::danger(format!("Cannot reach the finance API: {err}"))
        }
    };

    views::login_page(Some(&flash)).into_response()
}

pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (Session::clear(jar), Redirect::to("/login"))
}
