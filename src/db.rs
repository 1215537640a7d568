use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Maximum attempts for a contended multi-statement transaction
pub const TXN_MAX_ATTEMPTS: u32 = 3;

/// Backoff between transaction attempts
pub const TXN_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Creates and configures a PostgreSQL connection pool
///
/// The pool is built once at startup and injected into the repositories;
/// nothing in the request path reaches for ambient global state.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Returns true when an error is transient contention that a fresh
/// transaction attempt can resolve: lock_not_available (55P03),
/// serialization_failure (40001), deadlock_detected (40P01).
///
/// User-facing errors never match; only whole transactions are retried.
pub fn is_retryable(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return matches!(code.as_ref(), "55P03" | "40001" | "40P01");
        }
    }
    matches!(err, sqlx::Error::PoolTimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_retryable() {
        assert!(!is_retryable(&sqlx::Error::RowNotFound));
        assert!(!is_retryable(&sqlx::Error::ColumnNotFound("x".to_string())));
    }

    #[test]
    fn test_pool_timeout_is_retryable() {
        assert!(is_retryable(&sqlx::Error::PoolTimedOut));
    }
}
