//! SQLite participant repository implementation.
//!
//! Implements `ParticipantRepository` from `batepapo-core`. `last_status` is
//! stored as Unix milliseconds so the inactivity check is a plain integer
//! comparison in SQL. Joins and evictions write the participant row and the
//! matching status message in one transaction.

use batepapo_core::repository::participant::ParticipantRepository;
use batepapo_types::error::RepositoryError;
use batepapo_types::message::ChatMessage;
use batepapo_types::participant::Participant;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::map_sqlx_error;
use super::message::insert_message;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ParticipantRepository`.
pub struct SqliteParticipantRepository {
    pool: DatabasePool,
}

impl SqliteParticipantRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_participant(row: &sqlx::sqlite::SqliteRow) -> Result<Participant, RepositoryError> {
    let name: String = row
        .try_get("name")
        .map_err(map_sqlx_error)?;
    let ms: i64 = row
        .try_get("last_status_ms")
        .map_err(map_sqlx_error)?;
    let last_status = DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| RepositoryError::Query(format!("invalid last_status_ms: {ms}")))?;

    Ok(Participant { name, last_status })
}

/// Smallest whole millisecond not before `t`.
///
/// Stored times are whole milliseconds, so `stored < t` holds exactly when
/// `stored < ceil_millis(t)`.
fn ceil_millis(t: DateTime<Utc>) -> i64 {
    let ms = t.timestamp_millis();
    if t.timestamp_subsec_nanos() % 1_000_000 == 0 {
        ms
    } else {
        ms + 1
    }
}

impl ParticipantRepository for SqliteParticipantRepository {
    async fn create_with_status(
        &self,
        participant: &Participant,
        status: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query("INSERT INTO participants (name, last_status_ms) VALUES (?, ?)")
            .bind(&participant.name)
            .bind(participant.last_status.timestamp_millis())
            .execute(&mut *tx)
            .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                return Err(RepositoryError::Conflict(format!(
                    "participant '{}' already exists",
                    participant.name
                )));
            }
            Err(e) => return Err(map_sqlx_error(e)),
        }

        insert_message(&mut *tx, status).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        let row = sqlx::query("SELECT name, last_status_ms FROM participants WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_participant).transpose()
    }

    async fn touch(&self, name: &str, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE participants SET last_status_ms = ? WHERE name = ?")
            .bind(at.timestamp_millis())
            .bind(name)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        let rows = sqlx::query("SELECT name, last_status_ms FROM participants ORDER BY seq ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn remove_if_inactive_with_status(
        &self,
        name: &str,
        cutoff: DateTime<Utc>,
        status: &ChatMessage,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        let result =
            sqlx::query("DELETE FROM participants WHERE name = ? AND last_status_ms < ?")
                .bind(name)
                .bind(ceil_millis(cutoff))
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        // Dropping the transaction rolls it back.
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        insert_message(&mut *tx, status).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }
}
