//! Message routing service.
//!
//! Accepts messages from joined participants and answers "what can this
//! viewer see" over the append-only log.

use batepapo_types::error::ChatError;
use batepapo_types::message::{ChatMessage, MessageKind, Recipient};
use batepapo_types::sanitize::sanitize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::repository::message::MessageRepository;
use crate::repository::participant::ParticipantRepository;

/// Service routing posts into the log and filtering the log per viewer.
pub struct MessageService<P: ParticipantRepository, M: MessageRepository, C: Clock> {
    participants: P,
    messages: M,
    clock: C,
}

impl<P: ParticipantRepository, M: MessageRepository, C: Clock> MessageService<P, M, C> {
    /// Create a new message service with the given repositories.
    pub fn new(participants: P, messages: M, clock: C) -> Self {
        Self {
            participants,
            messages,
            clock,
        }
    }

    /// Post a message from `sender`.
    ///
    /// `kind` must be `message` or `private_message`; status messages are
    /// only produced by the presence service. Names and text are sanitized
    /// before validation and the sanitized values are what get stored.
    pub async fn post_message(
        &self,
        sender: &str,
        recipient: Recipient,
        text: &str,
        kind: &str,
    ) -> Result<ChatMessage, ChatError> {
        let kind = kind
            .parse::<MessageKind>()
            .ok()
            .filter(MessageKind::is_postable)
            .ok_or_else(|| ChatError::Validation(format!("unsupported message kind '{kind}'")))?;

        let recipient = match recipient {
            Recipient::Broadcast => Recipient::Broadcast,
            Recipient::Direct { name } => {
                let name = sanitize(&name);
                if name.is_empty() {
                    return Err(ChatError::Validation("recipient cannot be empty".to_string()));
                }
                Recipient::Direct { name }
            }
        };

        let text = sanitize(text);
        if text.is_empty() {
            return Err(ChatError::Validation("text cannot be empty".to_string()));
        }

        let sender = sanitize(sender);
        if self.participants.get(&sender).await?.is_none() {
            return Err(ChatError::Unauthorized(format!(
                "sender '{sender}' is not in the room"
            )));
        }

        let msg = ChatMessage::new(sender, recipient, text, kind, self.clock.now());
        self.messages.append(&msg).await?;

        info!(from = %msg.from, to = %msg.to, kind = %msg.kind, "message posted");
        Ok(msg)
    }

    /// The tail of the log visible to `viewer`, in append order.
    ///
    /// A missing, zero or negative `limit` returns the whole visible history.
    pub async fn list_messages(
        &self,
        viewer: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let viewer = sanitize(viewer);
        let limit = normalize_limit(limit);

        let messages = self.messages.list_visible(&viewer, limit).await?;
        debug!(viewer = %viewer, ?limit, count = messages.len(), "listed messages");
        Ok(messages)
    }
}

/// Map a caller-supplied limit to a repository limit (`None` = everything).
pub fn normalize_limit(limit: Option<i64>) -> Option<u32> {
    match limit {
        Some(n) if n > 0 => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        _ => None,
    }
}

/// Reference visibility filter over an in-memory log.
///
/// Keeps the messages `viewer` may see and returns the last `limit` of them
/// in log order.
pub fn visible_tail(log: &[ChatMessage], viewer: &str, limit: Option<u32>) -> Vec<ChatMessage> {
    let visible: Vec<&ChatMessage> = log.iter().filter(|m| m.is_visible_to(viewer)).collect();
    let skip = match limit {
        Some(n) => visible.len().saturating_sub(n as usize),
        None => 0,
    };
    visible.into_iter().skip(skip).cloned().collect()
}
