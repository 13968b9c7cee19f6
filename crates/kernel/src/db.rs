//! Database connection pool and transaction scoping.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::PgConnection;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// Check if the database connection is healthy.
pub async fn check_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Boxed future returned by a transaction-scoped closure.
pub type ScopedFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Scoped, atomic execution of a sequence of writes.
///
/// The closure receives an exclusive `&mut PgConnection` bound to one
/// transaction; every write issued through it commits or rolls back as a
/// unit. Because write methods require that handle, composed writes share
/// the single scope — there is no nested scope to mismanage. Dropping the
/// in-flight future (caller cancellation/timeout) drops the transaction,
/// which rolls back.
#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// The step's error is returned unchanged; only begin/commit failures
    /// surface as [`AppError::Transaction`].
    pub async fn run<T, F>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> ScopedFuture<'c, T> + Send,
        T: Send,
    {
        let mut tx = self.pool.begin().await.map_err(AppError::Transaction)?;

        match f(&mut *tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::Transaction)?;
                Ok(value)
            }
            Err(step_err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed for aborted scope");
                }
                Err(step_err)
            }
        }
    }
}
