//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod message;
pub mod participant;
pub mod pool;

use batepapo_types::error::RepositoryError;

/// Classify a sqlx failure: pool and I/O trouble is a connection error,
/// everything else a query error.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_sqlx_error() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            RepositoryError::Connection
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            RepositoryError::Query(_)
        ));
    }
}
