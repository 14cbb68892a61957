//! Repository for the append-only `job_log` table.
//!
//! Rows are never updated or deleted.

use sqlx::PgPool;

use crate::models::job_log::JobLogEntry;

/// Column list for `job_log` queries.
const COLUMNS: &str = "id, number, submitted_at";

/// Insert and read operations for accepted job indices.
pub struct JobLogRepo;

impl JobLogRepo {
    /// Record one accepted index. Returns the inserted row.
    pub async fn append(pool: &PgPool, number: i32) -> Result<JobLogEntry, sqlx::Error> {
        let query = format!("INSERT INTO job_log (number) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, JobLogEntry>(&query)
            .bind(number)
            .fetch_one(pool)
            .await
    }

    /// Every row, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<JobLogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_log ORDER BY id ASC");
        sqlx::query_as::<_, JobLogEntry>(&query)
            .fetch_all(pool)
            .await
    }
}
