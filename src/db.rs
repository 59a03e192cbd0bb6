//! PostgreSQL 连接
//! 启动时建立连接池并应用内嵌迁移

use crate::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// 启动阶段的数据库错误
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("cannot reach user store: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[source] MigrateError),
}

/// 建立连接池并把 users 表迁移到最新
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(config.url.expose_secret())
        .await
        .map_err(DbError::Connect)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(DbError::Migrate)?;

    tracing::info!(
        max_connections = config.max_connections,
        "User store connected, schema up to date"
    );

    Ok(pool)
}
