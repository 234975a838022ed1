use thiserror::Error;

/// Errors surfaced by the presence and messaging services.
///
/// Every variant is scoped to a single request or a single sweep cycle;
/// none of them is retryable.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in batepapo-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Out-of-range settings in `config.toml` or on the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sweep_interval_secs must be at least 1")]
    ZeroSweepInterval,

    #[error("inactivity timeout of {0}s is out of range (max {max}s)", max = crate::config::MAX_INACTIVITY_TIMEOUT_SECS)]
    TimeoutOutOfRange(u64),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => ChatError::Conflict(msg),
            other => ChatError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::Conflict("participant 'alice' already joined".to_string());
        assert_eq!(err.to_string(), "conflict: participant 'alice' already joined");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_repository_conflict_maps_to_chat_conflict() {
        let err: ChatError = RepositoryError::Conflict("dup".to_string()).into();
        assert!(matches!(err, ChatError::Conflict(ref m) if m == "dup"));
    }

    #[test]
    fn test_other_repository_errors_map_to_storage() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Storage(_)));

        let err: ChatError = RepositoryError::Query("disk full".to_string()).into();
        assert!(matches!(err, ChatError::Storage(ref m) if m.contains("disk full")));
    }
}
