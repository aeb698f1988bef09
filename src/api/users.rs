//! User management endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::user::UserSummary};

use super::AuthenticatedUser;

/// List registered users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registered users", body = Vec<UserSummary>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    claims.require_admin()?;

    let users = state.services.auth.list_users().await?;
    Ok(Json(users))
}
