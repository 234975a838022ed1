//! Chat message domain types for Batepapo.
//!
//! Defines the `ChatMessage` log entry, its `Recipient` (broadcast or direct),
//! and the `MessageKind` tag distinguishing user messages from status events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Display format of the `time` field (`HH:MM:SS`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Who a message is addressed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recipient {
    /// Visible to every participant.
    Broadcast,
    /// Addressed to a single participant.
    Direct { name: String },
}

impl Recipient {
    /// Direct recipient shorthand.
    pub fn direct(name: impl Into<String>) -> Self {
        Recipient::Direct { name: name.into() }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Broadcast => write!(f, "everyone"),
            Recipient::Direct { name } => write!(f, "{name}"),
        }
    }
}

/// Kind of a log entry.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('message', 'private_message', 'status'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Public message shown to the whole room.
    Message,
    /// Private message between two participants.
    PrivateMessage,
    /// System-generated join/leave event.
    Status,
}

impl MessageKind {
    /// Whether a participant may post this kind directly.
    pub fn is_postable(&self) -> bool {
        matches!(self, MessageKind::Message | MessageKind::PrivateMessage)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Message => write!(f, "message"),
            MessageKind::PrivateMessage => write!(f, "private_message"),
            MessageKind::Status => write!(f, "status"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            "status" => Ok(MessageKind::Status),
            other => Err(format!("invalid message kind: '{other}'")),
        }
    }
}

/// Presence transitions recorded as status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    Joined,
    Left,
}

impl StatusEvent {
    /// Text stored in the message body.
    pub fn as_text(&self) -> &'static str {
        match self {
            StatusEvent::Joined => "joined",
            StatusEvent::Left => "left",
        }
    }
}

/// An entry of the room's append-only message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// UUIDv7 message ID.
    pub id: Uuid,
    /// Sender name. Status messages carry the joining/leaving participant.
    pub from: String,
    /// Where this message is going.
    pub to: Recipient,
    /// Message body.
    pub text: String,
    pub kind: MessageKind,
    /// Wall-clock time of creation, `HH:MM:SS`.
    pub time: String,
    /// Full creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a new log entry stamped at `now`.
    pub fn new(
        from: impl Into<String>,
        to: Recipient,
        text: impl Into<String>,
        kind: MessageKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            from: from.into(),
            to,
            text: text.into(),
            kind,
            time: now.format(TIME_FORMAT).to_string(),
            created_at: now,
        }
    }

    /// Status message announcing `name` joining or leaving the room.
    pub fn status(name: impl Into<String>, event: StatusEvent, now: DateTime<Utc>) -> Self {
        Self::new(name, Recipient::Broadcast, event.as_text(), MessageKind::Status, now)
    }

    /// Visibility rule: the sender, the direct recipient, or anyone for broadcasts.
    pub fn is_visible_to(&self, viewer: &str) -> bool {
        if self.from == viewer {
            return true;
        }
        match &self.to {
            Recipient::Broadcast => true,
            Recipient::Direct { name } => name == viewer,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
