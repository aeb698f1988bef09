//! Session claims shared by the JSON API (bearer token) and the HTML UI (cookie)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Principal kind. Selects which panel and operations are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// JWT claims identifying a logged-in user or administrator
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    /// Login email
    pub sub: String,
    /// `users.user_id` or `admin.admin_id`, depending on `role`
    pub principal_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(email: &str, principal_id: i32, role: Role, lifetime_hours: u64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: email.to_string(),
            principal_id,
            role,
            exp: now + (lifetime_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Admin privileges required".to_string()))
        }
    }

    /// Patron-only operations (borrowing is done by users for themselves)
    pub fn require_user(&self) -> Result<i32, AppError> {
        match self.role {
            Role::User => Ok(self.principal_id),
            Role::Admin => Err(AppError::Authorization(
                "Only library users can borrow books".to_string(),
            )),
        }
    }
}
