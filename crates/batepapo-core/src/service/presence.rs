//! Presence tracking service.
//!
//! Keeps the set of joined participants, refreshes their last activity on
//! heartbeat, and evicts the ones that went quiet. Every join and every
//! eviction is recorded in the message log as a broadcast status message,
//! written together with the membership change.

use batepapo_types::error::{ChatError, RepositoryError};
use batepapo_types::message::{ChatMessage, StatusEvent};
use batepapo_types::participant::Participant;
use batepapo_types::sanitize::sanitize;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::repository::participant::ParticipantRepository;

/// Service owning the room's participant set.
///
/// Generic over the repository trait and the clock to maintain clean
/// architecture -- batepapo-core never depends on batepapo-infra.
pub struct PresenceService<P: ParticipantRepository, C: Clock> {
    participants: P,
    clock: C,
    /// Serializes sweeps against each other.
    sweep_lock: Mutex<()>,
}

impl<P: ParticipantRepository, C: Clock> PresenceService<P, C> {
    /// Create a new PresenceService.
    pub fn new(participants: P, clock: C) -> Self {
        Self {
            participants,
            clock,
            sweep_lock: Mutex::new(()),
        }
    }

    /// Join the room under `name` and announce it.
    pub async fn join(&self, name: &str) -> Result<Participant, ChatError> {
        let name = sanitize(name);
        if name.is_empty() {
            return Err(ChatError::Validation("name cannot be empty".to_string()));
        }

        let now = self.clock.now();
        let participant = Participant::new(name.clone(), now);
        let status = ChatMessage::status(&name, StatusEvent::Joined, now);

        self.participants
            .create_with_status(&participant, &status)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    ChatError::Conflict(format!("participant '{name}' already joined"))
                }
                other => ChatError::Storage(other.to_string()),
            })?;

        info!(participant = %name, "participant joined");
        Ok(participant)
    }

    /// Refresh a participant's last activity and return its new state.
    pub async fn heartbeat(&self, name: &str) -> Result<Participant, ChatError> {
        let name = sanitize(name);
        let now = self.clock.now();

        if !self.participants.touch(&name, now).await? {
            return Err(ChatError::NotFound(format!("participant '{name}' is not in the room")));
        }

        debug!(participant = %name, "heartbeat");
        Ok(Participant::new(name, now))
    }

    /// Current participants in join order.
    pub async fn list_participants(&self) -> Result<Vec<Participant>, ChatError> {
        Ok(self.participants.list().await?)
    }

    /// Evict every participant with `now - last_status > timeout`.
    ///
    /// Appends one "left" status message per evicted participant and returns
    /// their names in join order. A participant whose eviction fails stays in
    /// the room and is retried by the next sweep; the others are still
    /// processed. Concurrent calls run one after another.
    pub async fn sweep(
        &self,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Result<Vec<String>, ChatError> {
        let _guard = self.sweep_lock.lock().await;

        let cutoff = now.checked_sub_signed(timeout).ok_or_else(|| {
            ChatError::Validation(format!(
                "inactivity timeout of {}s is out of range",
                timeout.num_seconds()
            ))
        })?;

        let stale: Vec<Participant> = self
            .participants
            .list()
            .await?
            .into_iter()
            .filter(|p| p.is_inactive(now, timeout))
            .collect();

        let mut evicted = Vec::with_capacity(stale.len());
        for participant in stale {
            let status = ChatMessage::status(&participant.name, StatusEvent::Left, now);
            match self
                .participants
                .remove_if_inactive_with_status(&participant.name, cutoff, &status)
                .await
            {
                Ok(true) => {
                    info!(
                        participant = %participant.name,
                        last_status = %participant.last_status,
                        "participant evicted for inactivity"
                    );
                    evicted.push(participant.name);
                }
                // Heartbeat arrived after the listing.
                Ok(false) => {}
                Err(e) => {
                    warn!(participant = %participant.name, error = %e, "eviction failed");
                }
            }
        }

        Ok(evicted)
    }

    /// Sweep using this service's clock for "now".
    pub async fn sweep_stale(&self, timeout: Duration) -> Result<Vec<String>, ChatError> {
        self.sweep(self.clock.now(), timeout).await
    }
}
