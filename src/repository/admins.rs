//! Administrator accounts

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::admin::Admin};

#[derive(Clone)]
pub struct AdminsRepository {
    pool: Pool<Postgres>,
}

impl AdminsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT admin_id, email, password FROM admin WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Create the administrator, or replace its password hash if the email exists
    pub async fn upsert(&self, email: &str, password_hash: &str) -> AppResult<Admin> {
        let updated = sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admin SET password = $2
            WHERE LOWER(email) = LOWER($1)
            RETURNING admin_id, email, password
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(admin) = updated {
            return Ok(admin);
        }

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admin (email, password)
            VALUES ($1, $2)
            RETURNING admin_id, email, password
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }
}
