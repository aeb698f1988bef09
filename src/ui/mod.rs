//! Server-rendered HTML interface
//!
//! Three states: anonymous, logged-in user, logged-in admin. The state lives
//! in a session cookie holding the same JWT the JSON API accepts as a bearer
//! token. Every form submission performs one service call and re-renders
//! the whole page.

mod handlers;
mod views;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{models::session::SessionClaims, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/register", post(handlers::register))
        .route("/login/user", post(handlers::login_user))
        .route("/login/admin", post(handlers::login_admin))
        .route("/logout", post(handlers::logout))
        .route("/borrow", post(handlers::borrow))
        .route("/return", post(handlers::return_book))
        .with_state(state)
}

/// Sidebar selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    #[default]
    UserLogin,
    AdminLogin,
    Register,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::UserLogin, Panel::AdminLogin, Panel::Register];

    pub fn label(&self) -> &'static str {
        match self {
            Panel::UserLogin => "User Login",
            Panel::AdminLogin => "Admin Login",
            Panel::Register => "Register User",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Panel::UserLogin => "user-login",
            Panel::AdminLogin => "admin-login",
            Panel::Register => "register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Status banner shown after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, text: text.into() }
    }
}

/// Session from the cookie, if present and valid. Never rejects.
pub struct MaybeSession(pub Option<SessionClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.services.auth;
        let jar = CookieJar::from_headers(&parts.headers);

        let claims = jar
            .get(auth.session_cookie())
            .and_then(|cookie| match auth.verify_session(cookie.value()) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    tracing::debug!("Ignoring session cookie: {}", e);
                    None
                }
            });

        Ok(MaybeSession(claims))
    }
}
