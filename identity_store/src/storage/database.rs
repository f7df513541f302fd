use std::time::Duration;

use sqlx::AnyPool;
use sqlx::any::{Any, AnyArguments, AnyPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::query::Query;

use crate::config::{
    ConnectionStringProvider, DB_CONNECT_MAX_ATTEMPTS, DB_CONNECT_RETRY_DELAY, DB_MAX_CONNECTIONS,
};
use crate::errors::IdentityError;

use super::params::{BoundStatement, Params, SqlValue, bind_named};
use super::row::{DbRow, FromDbRow};
use super::schema::SCHEMA_STATEMENTS;

/// Gateway to the relational backend.
///
/// Holds a pooled handle instead of a single shared connection: every operation
/// acquires its own connection (retrying a bounded number of times) and releases
/// it when the operation returns, on success and on failure alike. Cloning is cheap
/// and clones share the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: AnyPool,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Database {
    /// Build a database from a named connection string.
    ///
    /// A name the provider does not know is a configuration error.
    pub fn from_config(
        provider: &dyn ConnectionStringProvider,
        name: &str,
    ) -> Result<Self, IdentityError> {
        let url = provider.connection_string(name).ok_or_else(|| {
            IdentityError::Configuration(format!("Connection string '{name}' is not configured"))
        })?;
        Self::connect_lazy(&url)
    }

    /// Create a pool for `url` without opening any connection yet.
    ///
    /// The backend is picked from the URL scheme (`sqlite:` or `postgres:`).
    /// An in-memory SQLite database exists only as long as its connection, so
    /// such URLs get a pool of one connection that is never closed.
    /// Must be called from within a Tokio runtime, since the pool spawns its
    /// maintenance task on creation.
    pub fn connect_lazy(url: &str) -> Result<Self, IdentityError> {
        sqlx::any::install_default_drivers();

        let options = if is_in_memory_sqlite(url) {
            AnyPoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(*DB_MAX_CONNECTIONS)
        };
        let max_connections = options.get_max_connections();

        let pool = options.connect_lazy(url).map_err(|e| {
            IdentityError::Configuration(format!("Invalid connection string: {e}"))
        })?;

        tracing::info!(max_connections, "Initialized identity database pool");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool, using the configured retry settings
    pub fn from_pool(pool: AnyPool) -> Self {
        Self {
            pool,
            max_attempts: *DB_CONNECT_MAX_ATTEMPTS,
            retry_delay: *DB_CONNECT_RETRY_DELAY,
        }
    }

    /// Override the acquisition retry policy
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Close the pool; further operations fail with a storage error
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create the identity tables when they do not exist yet
    pub async fn init_schema(&self) -> Result<(), IdentityError> {
        for statement in SCHEMA_STATEMENTS {
            self.execute(statement, &Params::new()).await?;
        }
        tracing::debug!("Identity schema ensured");
        Ok(())
    }

    /// Run a statement that returns no rows; yields the number of affected rows
    pub async fn execute(&self, statement: &str, params: &Params) -> Result<u64, IdentityError> {
        let bound = bind_named(statement, params)?;
        let mut conn = self.acquire().await?;

        tracing::debug!(statement = %bound.sql, params = bound.values.len(), "Executing statement");

        let result = bind_values(sqlx::query(&bound.sql), &bound)
            .execute(&mut *conn)
            .await
            .map_err(|e| IdentityError::Storage(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Run a query and return the first column of the first row, if any
    pub async fn query_scalar(
        &self,
        statement: &str,
        params: &Params,
    ) -> Result<Option<String>, IdentityError> {
        let bound = bind_named(statement, params)?;
        let mut conn = self.acquire().await?;

        tracing::debug!(statement = %bound.sql, params = bound.values.len(), "Querying scalar");

        let row = bind_values(sqlx::query(&bound.sql), &bound)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| IdentityError::Storage(e.to_string()))?;

        match row {
            Some(row) => Ok(DbRow::from_any_row(&row)?.first().map(str::to_string)),
            None => Ok(None),
        }
    }

    /// Run a query and return every row as a column-name to text mapping
    pub async fn query(
        &self,
        statement: &str,
        params: &Params,
    ) -> Result<Vec<DbRow>, IdentityError> {
        let bound = bind_named(statement, params)?;
        let mut conn = self.acquire().await?;

        tracing::debug!(statement = %bound.sql, params = bound.values.len(), "Querying rows");

        let rows = bind_values(sqlx::query(&bound.sql), &bound)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| IdentityError::Storage(e.to_string()))?;

        rows.iter().map(DbRow::from_any_row).collect()
    }

    /// Run a query and map every row through `T`'s row mapping
    pub async fn query_as<T: FromDbRow>(
        &self,
        statement: &str,
        params: &Params,
    ) -> Result<Vec<T>, IdentityError> {
        self.query(statement, params)
            .await?
            .iter()
            .map(T::from_db_row)
            .collect()
    }

    async fn acquire(&self) -> Result<PoolConnection<Any>, IdentityError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.pool.acquire().await {
                Ok(conn) => return Ok(conn),
                Err(e) if attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Failed to open database connection, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Giving up on database connection");
                    return Err(IdentityError::Storage(format!(
                        "Failed to open connection after {attempt} attempts: {e}"
                    )));
                }
            }
        }
    }
}

fn is_in_memory_sqlite(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

fn bind_values<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    bound: &BoundStatement,
) -> Query<'q, Any, AnyArguments<'q>> {
    for value in &bound.values {
        query = match value {
            SqlValue::Text(text) => query.bind(text.clone()),
            SqlValue::Int(n) => query.bind(*n),
        };
    }
    query
}
