//! Message repository trait definition.
//!
//! Defines the storage interface for the room's append-only message log.
//! The infrastructure layer (batepapo-infra) implements this trait with
//! SQLite persistence.

use batepapo_types::error::RepositoryError;
use batepapo_types::message::ChatMessage;

/// Repository trait for the append-only message log.
pub trait MessageRepository: Send + Sync {
    /// Append a message to the end of the log.
    fn append(
        &self,
        msg: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages visible to `viewer`, in append order.
    ///
    /// With `Some(n)` only the last `n` visible messages are returned;
    /// `None` returns the whole visible history.
    fn list_visible(
        &self,
        viewer: &str,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
