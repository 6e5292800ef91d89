//! Database connection pool management.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::env;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::credentials::{self, Credentials};
use crate::error::{Error, Result};

/// Type alias for the database pool.
pub type Pool = PgPool;

/// Maximum number of concurrent connections in the pool.
const MAX_CONNECTIONS: u32 = 20;

/// Idle connections are reaped after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Checking out a connection gives up after this long.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Lazily initialized handle to the connection pool.
///
/// Constructed explicitly and passed to whoever needs the database, rather
/// than living in process-global state. The first successful `initialize`
/// call resolves credentials, connects, and caches the pool; failures are
/// never cached, so callers may retry.
#[derive(Debug, Default)]
pub struct Database {
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            pool: OnceCell::new(),
        }
    }

    /// Resolve credentials and connect, or return the already-established
    /// pool. Idempotent: a cached pool is returned without re-validation.
    pub async fn initialize(&self) -> Result<&PgPool> {
        self.pool
            .get_or_try_init(|| async {
                let credentials = credentials::resolve().await?;
                connect(&credentials).await
            })
            .await
    }

    /// Return the established pool, or fail if `initialize` never succeeded.
    pub fn pool(&self) -> Result<&PgPool> {
        self.pool.get().ok_or(Error::NotInitialized)
    }

    /// Close the pool if one was established.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

/// Build the pool and probe it with a trivial query before handing it out.
async fn connect(credentials: &Credentials) -> Result<PgPool> {
    let ssl_mode = if env::var("DB_SSL").map(|v| v == "true").unwrap_or(false) {
        // Encrypted but without certificate verification, matching the
        // permissive mode used against RDS instances with default certs.
        PgSslMode::Require
    } else {
        PgSslMode::Disable
    };

    let options = PgConnectOptions::new()
        .host(&credentials.host)
        .port(credentials.port)
        .database(&credentials.database)
        .username(&credentials.username)
        .password(&credentials.password)
        .ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .idle_timeout(IDLE_TIMEOUT)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(Error::ConnectionInitFailed)?;

    // Liveness probe: a pool that cannot run a trivial query is not cached.
    sqlx::query("SELECT NOW()")
        .execute(&pool)
        .await
        .map_err(Error::ConnectionInitFailed)?;

    tracing::info!("database connection established");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pool_fails_before_initialize() {
        let db = Database::new();
        assert!(matches!(db.pool(), Err(Error::NotInitialized)));
    }

    #[tokio::test]
    async fn close_without_pool_is_a_noop() {
        let db = Database::new();
        db.close().await;
        assert!(matches!(db.pool(), Err(Error::NotInitialized)));
    }
}
