//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        session::{Role, SessionClaims},
        user::{RegisterUser, UserSummary},
    },
};

use super::AuthenticatedUser;

/// Login request (users and administrators)
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued session token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// `user_id` for users, `admin_id` for administrators
    pub principal_id: i32,
    pub role: Role,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = UserSummary),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<UserSummary>)> {
    let user = state.services.auth.register_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserSummary {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
        }),
    ))
}

/// Log in as a user
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let auth = &state.services.auth;
    let login = auth
        .login_user(&request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    let (_, token) = auth.issue_session(&request.email, login.user_id, login.role)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        principal_id: login.user_id,
        role: login.role,
    }))
}

/// Log in as an administrator
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid admin credentials")
    )
)]
pub async fn admin_login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let auth = &state.services.auth;
    let login = auth
        .login_admin(&request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid admin credentials".to_string()))?;

    let (_, token) = auth.issue_session(&request.email, login.admin_id, Role::Admin)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        principal_id: login.admin_id,
        role: Role::Admin,
    }))
}

/// Current session
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session claims", body = SessionClaims),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<SessionClaims> {
    Json(claims)
}
