//! In-memory repositories for service tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use batepapo_types::error::RepositoryError;
use batepapo_types::message::ChatMessage;
use batepapo_types::participant::Participant;
use chrono::{DateTime, TimeZone, Utc};

use crate::repository::message::MessageRepository;
use crate::repository::participant::ParticipantRepository;
use crate::service::message::visible_tail;

/// Fixed start instant for deterministic tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap()
}

/// Shared participant set writing status messages into an [`InMemoryMessages`] log.
#[derive(Clone, Default)]
pub struct InMemoryParticipants {
    inner: Arc<Mutex<Vec<Participant>>>,
    log: InMemoryMessages,
}

impl InMemoryParticipants {
    pub fn with_log(log: InMemoryMessages) -> Self {
        Self {
            inner: Arc::default(),
            log,
        }
    }
}

impl ParticipantRepository for InMemoryParticipants {
    async fn create_with_status(
        &self,
        participant: &Participant,
        status: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        let mut list = self.inner.lock().unwrap();
        if list.iter().any(|p| p.name == participant.name) {
            return Err(RepositoryError::Conflict(participant.name.clone()));
        }
        self.log.push(status)?;
        list.push(participant.clone());
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        Ok(self.inner.lock().unwrap().iter().find(|p| p.name == name).cloned())
    }

    async fn touch(&self, name: &str, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let mut list = self.inner.lock().unwrap();
        match list.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.last_status = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.inner.lock().unwrap().clone())
    }

    async fn remove_if_inactive_with_status(
        &self,
        name: &str,
        cutoff: DateTime<Utc>,
        status: &ChatMessage,
    ) -> Result<bool, RepositoryError> {
        let mut list = self.inner.lock().unwrap();
        let Some(idx) = list.iter().position(|p| p.name == name && p.last_status < cutoff) else {
            return Ok(false);
        };
        self.log.push(status)?;
        list.remove(idx);
        Ok(true)
    }
}

/// Append-only log. Appends from a sender marked with [`fail_for`] fail
/// with `Connection`, leaving the log untouched.
///
/// [`fail_for`]: InMemoryMessages::fail_for
#[derive(Clone, Default)]
pub struct InMemoryMessages {
    inner: Arc<Mutex<Vec<ChatMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl InMemoryMessages {
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.inner.lock().unwrap().clone()
    }

    pub fn fail_for(&self, sender: &str) {
        self.failing.lock().unwrap().insert(sender.to_string());
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn push(&self, msg: &ChatMessage) -> Result<(), RepositoryError> {
        if self.failing.lock().unwrap().contains(&msg.from) {
            return Err(RepositoryError::Connection);
        }
        self.inner.lock().unwrap().push(msg.clone());
        Ok(())
    }
}

impl MessageRepository for InMemoryMessages {
    async fn append(&self, msg: &ChatMessage) -> Result<(), RepositoryError> {
        self.push(msg)
    }

    async fn list_visible(
        &self,
        viewer: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(visible_tail(&self.inner.lock().unwrap(), viewer, limit))
    }
}
