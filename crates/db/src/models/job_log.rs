//! Row model for the `job_log` table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use fibber_core::job::AcceptedJob;

use crate::DbId;

/// A row from the `job_log` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobLogEntry {
    pub id: DbId,
    pub number: i32,
    pub submitted_at: DateTime<Utc>,
}

impl From<JobLogEntry> for AcceptedJob {
    fn from(entry: JobLogEntry) -> Self {
        AcceptedJob {
            number: entry.number,
        }
    }
}
