//! Small helpers for opening and closing service transactions.

use sqlx::{PgPool, Postgres, Transaction};

use urpearl_core::result::AppResult;
use urpearl_core::{AppError, ErrorKind};

/// Begin a database transaction.
pub(crate) async fn begin(pool: &PgPool) -> AppResult<Transaction<'_, Postgres>> {
    pool.begin().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
    })
}

/// Commit a database transaction.
pub(crate) async fn commit(tx: Transaction<'_, Postgres>) -> AppResult<()> {
    tx.commit().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
    })
}
