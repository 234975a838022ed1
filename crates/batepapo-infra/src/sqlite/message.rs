//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `batepapo-core`. The log is ordered by
//! the `seq` column; visibility filtering and the tail limit are both applied
//! in SQL.

use batepapo_core::repository::message::MessageRepository;
use batepapo_types::error::RepositoryError;
use batepapo_types::message::{ChatMessage, MessageKind, Recipient};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    sender: String,
    recipient_type: String,
    recipient_name: Option<String>,
    body: String,
    kind: String,
    time: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            recipient_type: row.try_get("recipient_type")?,
            recipient_name: row.try_get("recipient_name")?,
            body: row.try_get("body")?,
            kind: row.try_get("kind")?,
            time: row.try_get("time")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let to = match self.recipient_type.as_str() {
            "broadcast" => Recipient::Broadcast,
            "direct" => {
                let name = self.recipient_name.ok_or_else(|| {
                    RepositoryError::Query("direct message missing recipient_name".into())
                })?;
                Recipient::Direct { name }
            }
            other => {
                return Err(RepositoryError::Query(format!(
                    "unknown recipient_type: {other}"
                )));
            }
        };

        let kind = self
            .kind
            .parse::<MessageKind>()
            .map_err(RepositoryError::Query)?;

        Ok(ChatMessage {
            id: parse_uuid(&self.id)?,
            from: self.sender,
            to,
            text: self.body,
            kind,
            time: self.time,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    s.parse::<Uuid>()
        .map_err(|e| RepositoryError::Query(format!("invalid UUID: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Insert `msg` at the end of the log through any SQLite executor, so the
/// participant repository can append status messages inside its transactions.
pub(super) async fn insert_message<'e, E>(executor: E, msg: &ChatMessage) -> Result<(), RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let (recipient_type, recipient_name) = match &msg.to {
        Recipient::Broadcast => ("broadcast", None),
        Recipient::Direct { name } => ("direct", Some(name.as_str())),
    };

    let result = sqlx::query(
        r#"INSERT INTO messages
           (id, sender, recipient_type, recipient_name, body, kind, time, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(msg.id.to_string())
    .bind(&msg.from)
    .bind(recipient_type)
    .bind(recipient_name)
    .bind(&msg.text)
    .bind(msg.kind.to_string())
    .bind(&msg.time)
    .bind(msg.created_at.to_rfc3339())
    .execute(executor)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
            RepositoryError::Conflict(format!("message '{}' already exists", msg.id)),
        ),
        Err(e) => Err(map_sqlx_error(e)),
    }
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, msg: &ChatMessage) -> Result<(), RepositoryError> {
        insert_message(&self.pool.writer, msg).await
    }

    async fn list_visible(
        &self,
        viewer: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // Newest first so LIMIT keeps the tail; reversed below. LIMIT -1 is unbounded.
        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE sender = ?
                  OR recipient_type = 'broadcast'
                  OR (recipient_type = 'direct' AND recipient_name = ?)
               ORDER BY seq DESC
               LIMIT ?"#,
        )
        .bind(viewer)
        .bind(viewer)
        .bind(limit.map(i64::from).unwrap_or(-1))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut msgs = Vec::with_capacity(rows.len());
        for row in rows.iter().rev() {
            let r = MessageRow::from_row(row).map_err(map_sqlx_error)?;
            msgs.push(r.into_message()?);
        }
        Ok(msgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batepapo_core::service::message::visible_tail;
    use chrono::{Duration, TimeZone};

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap()
    }

    fn broadcast(from: &str, text: &str) -> ChatMessage {
        ChatMessage::new(from, Recipient::Broadcast, text, MessageKind::Message, t0())
    }

    fn private(from: &str, to: &str, text: &str) -> ChatMessage {
        ChatMessage::new(from, Recipient::direct(to), text, MessageKind::PrivateMessage, t0())
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let msg = ChatMessage::new(
            "alice",
            Recipient::direct("bob"),
            "hi bob",
            MessageKind::PrivateMessage,
            t0() + Duration::nanoseconds(123_456_789),
        );
        repo.append(&msg).await.unwrap();

        let got = repo.list_visible("bob", None).await.unwrap();
        assert_eq!(got, vec![msg]);
    }

    #[tokio::test]
    async fn test_append_duplicate_id_conflicts() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let msg = broadcast("alice", "once");
        repo.append(&msg).await.unwrap();

        let err = repo.append(&msg).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_private_messages_hidden_from_third_parties() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        repo.append(&private("alice", "bob", "secret")).await.unwrap();
        repo.append(&broadcast("carol", "hello all")).await.unwrap();

        let carol: Vec<String> = repo
            .list_visible("carol", None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(carol, vec!["hello all"]);

        for viewer in ["alice", "bob"] {
            let view = repo.list_visible(viewer, None).await.unwrap();
            assert_eq!(view.len(), 2, "viewer {viewer}");
        }
    }

    #[tokio::test]
    async fn test_list_visible_matches_in_memory_filter() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let log = vec![
            ChatMessage::status("alice", batepapo_types::message::StatusEvent::Joined, t0()),
            broadcast("alice", "1"),
            private("alice", "carol", "2"),
            private("carol", "bob", "3"),
            broadcast("bob", "4"),
            private("alice", "carol", "5"),
            private("bob", "bob", "6"),
        ];
        for msg in &log {
            repo.append(msg).await.unwrap();
        }

        for viewer in ["alice", "bob", "carol", "dave"] {
            for limit in [None, Some(1), Some(2), Some(3), Some(100)] {
                let got = repo.list_visible(viewer, limit).await.unwrap();
                assert_eq!(
                    got,
                    visible_tail(&log, viewer, limit),
                    "viewer {viewer} limit {limit:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_list_visible_empty_log() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        assert!(repo.list_visible("anyone", Some(10)).await.unwrap().is_empty());
    }
}
