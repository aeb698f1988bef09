//! API handlers for Libris REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{error::AppError, models::session::SessionClaims, AppState};

/// Extractor for the authenticated principal.
///
/// Accepts a bearer token, or the browser session cookie set by the UI.
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.services.auth;

        if let Ok(TypedHeader(Authorization(bearer))) =
            parts.extract::<TypedHeader<Authorization<Bearer>>>().await
        {
            return auth.verify_session(bearer.token()).map(AuthenticatedUser);
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(auth.session_cookie())
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        auth.verify_session(&token).map(AuthenticatedUser)
    }
}
