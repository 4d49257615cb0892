//! Session and flash cookies.
//!
//! Both live in encrypted private cookies, so the access token of the remote
//! API never reaches the browser in clear.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

const SESSION_COOKIE: &str = "dompet_session";
const FLASH_COOKIE: &str = "dompet_flash";

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// The signed-in user: the bearer token for the API plus a display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    pub fn from_jar(jar: &PrivateCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        serde_json::from_str(cookie.value()).ok()
    }

    pub fn store(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        match serde_json::to_string(self) {
            Ok(value) => jar.add(cookie(SESSION_COOKIE, value)),
            Err(err) => {
                tracing::error!("failed to encode session: {err}");
                jar
            }
        }
    }

    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(removal(SESSION_COOKIE))
    }
}

/// Pages behind the login take a [`Session`]; without one the browser is sent
/// to `/login`.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state));
        Session::from_jar(&jar).ok_or_else(|| Redirect::to("/login"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    /// Bootstrap alert class suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    pub fn push(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        match serde_json::to_string(self) {
            Ok(value) => jar.add(cookie(FLASH_COOKIE, value)),
            Err(err) => {
                tracing::error!("failed to encode flash message: {err}");
                jar
            }
        }
    }

    /// Reads the pending message, if any, and removes it from the jar.
    pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Self>) {
        let Some(cookie) = jar.get(FLASH_COOKIE) else {
            return (jar, None);
        };
        let flash = serde_json::from_str(cookie.value()).ok();
        (jar.remove(removal(FLASH_COOKIE)), flash)
    }
}
