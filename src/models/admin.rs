//! Administrator model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `admin(admin_id, email, password)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub admin_id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Successful administrator login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminLogin {
    pub admin_id: i32,
}
