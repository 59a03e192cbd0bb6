//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::user::{NewUser, User},
};
use async_trait::async_trait;
use sqlx::PgPool;

/// Result of a store connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Gateway to persisted user records
///
/// Only parameterized lookups and inserts cross this boundary. Uniqueness of
/// the identifier is enforced by the store itself.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by normalized identifier
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user, failing with `DuplicateIdentifier` on a taken email
    async fn insert(&self, user: &NewUser) -> Result<User, AppError>;

    /// Connectivity check behind /ready
    async fn ping(&self) -> HealthStatus;
}

/// Postgres-backed user store
pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, first_name, last_name, email, password_hash,
                   "condition", color, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: &NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, "condition", color)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, first_name, last_name, email, password_hash,
                      "condition", color, created_at
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.condition)
        .bind(&user.color)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateIdentifier;
                }
            }
            tracing::error!(error = %e, "Failed to insert user");
            AppError::StoreUnavailable(e)
        })
    }

    async fn ping(&self) -> HealthStatus {
        match sqlx::query("SELECT 1").execute(&self.db).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => {
                tracing::warn!(error = %e, "User store ping failed");
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Unhealthy("connection refused".to_string()).is_healthy());
    }
}
