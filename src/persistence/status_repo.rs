//! Status record repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::day::DayKey;
use crate::models::status::{StatusCounts, StatusRecord, UpsertOutcome, WorkStatus};
use crate::{AppError, Result};

use super::db::Database;

/// Which records a bulk purge removes.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurgeScope {
    /// Every record.
    All,
    /// Records that carry a user identifier.
    #[default]
    WithUser,
}

/// Repository for per-member daily status records.
#[derive(Clone)]
pub struct StatusRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct StatusRow {
    id: String,
    user_id: String,
    channel_id: String,
    day: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl StatusRow {
    fn into_record(self) -> Result<StatusRecord> {
        let status = parse_status(&self.status)?;
        let day = DayKey::parse(&self.day)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Db(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);
        let updated_at = chrono::DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| AppError::Db(format!("invalid updated_at: {e}")))?
            .with_timezone(&Utc);

        Ok(StatusRecord {
            id: self.id,
            user_id: self.user_id,
            channel_id: self.channel_id,
            day,
            status,
            created_at,
            updated_at,
        })
    }
}

fn parse_status(s: &str) -> Result<WorkStatus> {
    WorkStatus::from_code(s).ok_or_else(|| AppError::Db(format!("invalid status: {s}")))
}

impl StatusRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Look up the record for one member on one board day.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn find(
        &self,
        user_id: &str,
        channel_id: &str,
        day: DayKey,
    ) -> Result<Option<StatusRecord>> {
        let row: Option<StatusRow> = sqlx::query_as(
            "SELECT id, user_id, channel_id, day, status, created_at, updated_at
             FROM status_record
             WHERE user_id = ?1 AND channel_id = ?2 AND day = ?3",
        )
        .bind(user_id)
        .bind(channel_id)
        .bind(day.to_string())
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(StatusRow::into_record).transpose()
    }

    /// Record a member's status: insert when absent, change when different,
    /// leave untouched when equal.
    ///
    /// The write is a single `INSERT … ON CONFLICT DO UPDATE` against the
    /// unique `(user_id, channel_id, day)` index, so concurrent clicks never
    /// produce a second row and the last write wins. The preceding read only
    /// classifies the outcome.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn upsert(
        &self,
        user_id: &str,
        channel_id: &str,
        day: DayKey,
        status: WorkStatus,
    ) -> Result<UpsertOutcome> {
        let existed = self.find(user_id, channel_id, day).await?.is_some();

        let record = StatusRecord::new(user_id.to_owned(), channel_id.to_owned(), day, status);
        let now = record.created_at.to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO status_record (id, user_id, channel_id, day, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(user_id, channel_id, day) DO UPDATE
             SET status = excluded.status, updated_at = excluded.updated_at
             WHERE status_record.status <> excluded.status",
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.channel_id)
        .bind(day.to_string())
        .bind(status.code())
        .bind(&now)
        .execute(self.db.as_ref())
        .await?;

        let outcome = match (result.rows_affected(), existed) {
            (0, _) => UpsertOutcome::Unchanged,
            (_, false) => UpsertOutcome::Created,
            (_, true) => UpsertOutcome::Updated,
        };
        debug!(user_id, channel_id, %day, status = status.code(), ?outcome, "status upserted");
        Ok(outcome)
    }

    /// All records for a channel on one day, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_for_day(&self, channel_id: &str, day: DayKey) -> Result<Vec<StatusRecord>> {
        let rows: Vec<StatusRow> = sqlx::query_as(
            "SELECT id, user_id, channel_id, day, status, created_at, updated_at
             FROM status_record
             WHERE channel_id = ?1 AND day = ?2
             ORDER BY created_at ASC",
        )
        .bind(channel_id)
        .bind(day.to_string())
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(StatusRow::into_record).collect()
    }

    /// Number of records per status for a channel on one day.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails or returns an unknown status.
    pub async fn count_by_status(&self, channel_id: &str, day: DayKey) -> Result<StatusCounts> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) AS count
             FROM status_record
             WHERE channel_id = ?1 AND day = ?2
             GROUP BY status",
        )
        .bind(channel_id)
        .bind(day.to_string())
        .fetch_all(self.db.as_ref())
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let count = u32::try_from(count)
                .map_err(|_| AppError::Db(format!("count out of range: {count}")))?;
            counts.set(parse_status(&status)?, count);
        }
        Ok(counts)
    }

    /// Bulk-delete records. Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete_all(&self, scope: PurgeScope) -> Result<u64> {
        let sql = match scope {
            PurgeScope::All => "DELETE FROM status_record",
            PurgeScope::WithUser => "DELETE FROM status_record WHERE user_id <> ''",
        };
        let result = sqlx::query(sql).execute(self.db.as_ref()).await?;
        Ok(result.rows_affected())
    }
}
