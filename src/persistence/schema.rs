//! `SQLite` schema bootstrap logic.
//!
//! All definitions use `IF NOT EXISTS`, so the bootstrap is safe to re-run
//! on every startup.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// The unique index on `(user_id, channel_id, day)` is what keeps a member
/// to a single record per board; `StatusRepo::upsert` relies on it.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS status_record (
    id              TEXT PRIMARY KEY NOT NULL,
    user_id         TEXT NOT NULL,
    channel_id      TEXT NOT NULL,
    day             TEXT NOT NULL,
    status          TEXT NOT NULL CHECK(status IN ('office','remote','off_site','left')),
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_status_member_day
    ON status_record(user_id, channel_id, day);
CREATE INDEX IF NOT EXISTS idx_status_channel_day
    ON status_record(channel_id, day);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
