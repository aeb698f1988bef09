//! User (patron) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::session::Role;

/// Row of `users(user_id, name, email, password, role)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
}

/// Registered user as shown on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    /// Full name
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

impl RegisterUser {
    /// Trim surrounding whitespace from name and email
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

/// Successful user login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserLogin {
    pub user_id: i32,
    pub role: Role,
}
