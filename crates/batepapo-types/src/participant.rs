//! Room participant type.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A participant currently joined to the room.
///
/// `name` is the unique identifier. `last_status` is refreshed by every
/// heartbeat and drives the inactivity sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub last_status: DateTime<Utc>,
}

impl Participant {
    /// Create a participant that was last seen at `now`.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            last_status: now,
        }
    }

    /// Whether this participant has been silent for strictly longer than `timeout`.
    pub fn is_inactive(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_status > timeout
    }
}
