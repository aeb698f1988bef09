//! Registration, login and session tokens

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        admin::{Admin, AdminLogin},
        session::{Role, SessionClaims},
        user::{RegisterUser, User, UserLogin, UserSummary},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new patron with role `user`
    pub async fn register_user(&self, request: RegisterUser) -> AppResult<User> {
        let request = request.normalized();
        request.validate()?;

        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "User already exists! Try logging in.".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(&request.name, &request.email, &password_hash)
            .await?;

        tracing::info!("Registered user {} ({})", user.user_id, user.email);
        Ok(user)
    }

    /// Check patron credentials. `None` when the email is unknown or the
    /// password does not match.
    pub async fn login_user(&self, email: &str, password: &str) -> AppResult<Option<UserLogin>> {
        let Some(user) = self.repository.users.get_by_email(email.trim()).await? else {
            return Ok(None);
        };

        if !verify_password(&user.password, password) {
            return Ok(None);
        }

        Ok(Some(UserLogin {
            user_id: user.user_id,
            role: Role::User,
        }))
    }

    /// Check administrator credentials
    pub async fn login_admin(&self, email: &str, password: &str) -> AppResult<Option<AdminLogin>> {
        let Some(admin) = self.repository.admins.get_by_email(email.trim()).await? else {
            return Ok(None);
        };

        if !verify_password(&admin.password, password) {
            return Ok(None);
        }

        Ok(Some(AdminLogin {
            admin_id: admin.admin_id,
        }))
    }

    /// Sign a session token for a logged-in principal
    pub fn issue_session(
        &self,
        email: &str,
        principal_id: i32,
        role: Role,
    ) -> AppResult<(SessionClaims, String)> {
        let claims =
            SessionClaims::new(email.trim(), principal_id, role, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;
        Ok((claims, token))
    }

    /// Decode a session token
    pub fn verify_session(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Create the configured administrator, or reset its password
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<Admin> {
        let password_hash = hash_password(password)?;
        let admin = self.repository.admins.upsert(email.trim(), &password_hash).await?;
        tracing::info!("Administrator account {} ready", admin.email);
        Ok(admin)
    }

    /// All registered users
    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        self.repository.users.list().await
    }

    pub fn session_cookie(&self) -> &str {
        &self.config.session_cookie
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 PHC string. A stored value
/// that is not a PHC string never matches.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!("Stored password is not an Argon2 hash ({}); treating as mismatch", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
