use async_trait::async_trait;
use once_cell::sync::OnceCell;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::store::HealthCheck;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Timed out connecting to database after {0}s")]
    ConnectTimeout(u64),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the one connection pool shared by every request.
///
/// Built once at startup and handed to the router by `Arc`. The pool itself is
/// created on the first call to [`DatabaseManager::pool`] and reused afterwards;
/// creation never opens a connection, so an unreachable server only shows up
/// when a query runs.
pub struct DatabaseManager {
    config: DatabaseConfig,
    pool: OnceCell<Pooled>,
}

struct Pooled {
    pool: PgPool,
    options: PgConnectOptions,
}

impl DatabaseManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Get the shared pool, creating it on first use
    pub fn pool(&self) -> Result<PgPool, DatabaseError> {
        Ok(self.pooled()?.pool.clone())
    }

    fn pooled(&self) -> Result<&Pooled, DatabaseError> {
        self.pool.get_or_try_init(|| self.build_pool())
    }

    /// Check out a connection from the shared pool.
    ///
    /// sqlx retries refused connects until `acquire_timeout` and then reports
    /// only `PoolTimedOut`. While the pool holds no connections, one is opened
    /// directly first so a dead server fails at once with its own error.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DatabaseError> {
        let pooled = self.pooled()?;
        if pooled.pool.size() == 0 {
            self.connect_direct(&pooled.options).await?;
        }

        match pooled.pool.acquire().await {
            Ok(conn) => Ok(conn),
            Err(sqlx::Error::PoolTimedOut) => {
                // Server went away while the pool was warm
                self.connect_direct(&pooled.options).await?;
                Err(sqlx::Error::PoolTimedOut.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn connect_direct(&self, options: &PgConnectOptions) -> Result<(), DatabaseError> {
        let seconds = self.config.connection_timeout;
        let conn = tokio::time::timeout(
            Duration::from_secs(seconds),
            PgConnection::connect_with(options),
        )
        .await
        .map_err(|_| DatabaseError::ConnectTimeout(seconds))??;
        conn.close().await?;
        Ok(())
    }

    /// Whether the pool has been created yet
    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    fn build_pool(&self) -> Result<Pooled, DatabaseError> {
        let connection_string = Self::validate_connection_string(self.config.url.as_deref())?;
        let options = PgConnectOptions::from_str(&connection_string)?;

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(Duration::from_secs(self.config.connection_timeout))
            .connect_lazy_with(options.clone());

        info!(
            "Created database pool for: {}",
            Self::redact(&connection_string)
        );
        Ok(Pooled { pool, options })
    }

    fn validate_connection_string(url: Option<&str>) -> Result<String, DatabaseError> {
        let url = url.ok_or(DatabaseError::ConfigMissing("URL_BD"))?;
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match parsed.scheme() {
            "postgres" | "postgresql" => Ok(url.to_string()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Connection string with the password masked, for logs
    fn redact(connection_string: &str) -> String {
        match url::Url::parse(connection_string) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.into()
            }
            Err(_) => "<invalid>".to_string(),
        }
    }

    /// Close the pool if it was ever created (e.g., on shutdown)
    pub async fn close(&self) {
        if let Some(pooled) = self.pool.get() {
            pooled.pool.close().await;
            info!("Closed database pool");
        }
    }
}

#[async_trait]
impl HealthCheck for DatabaseManager {
    /// Pings the pool to ensure connectivity
    async fn ping(&self) -> Result<(), DatabaseError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
