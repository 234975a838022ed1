//! Participant repository trait definition.

use batepapo_types::error::RepositoryError;
use batepapo_types::message::ChatMessage;
use batepapo_types::participant::Participant;
use chrono::{DateTime, Utc};

/// Repository trait for the set of joined participants.
///
/// Implementations live in batepapo-infra (e.g., `SqliteParticipantRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
///
/// Membership changes are recorded in the message log, so the methods that
/// add or remove a participant take the status message to append with it.
/// Both writes succeed together or neither happens.
pub trait ParticipantRepository: Send + Sync {
    /// Register a participant and append `status` to the log.
    ///
    /// Returns `Conflict` if the name is already taken.
    fn create_with_status(
        &self,
        participant: &Participant,
        status: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a participant by name.
    fn get(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Participant>, RepositoryError>> + Send;

    /// Set `last_status` for a participant. Returns `false` if no such participant.
    fn touch(
        &self,
        name: &str,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// List participants in join order.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Participant>, RepositoryError>> + Send;

    /// Remove a participant only if its `last_status` is still before `cutoff`,
    /// appending `status` to the log in the same step.
    ///
    /// Returns `true` if a row was removed. A heartbeat that lands between the
    /// sweep's listing and this call keeps the participant in the room, and
    /// then nothing is appended.
    fn remove_if_inactive_with_status(
        &self,
        name: &str,
        cutoff: DateTime<Utc>,
        status: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
