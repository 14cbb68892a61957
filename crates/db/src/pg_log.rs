use async_trait::async_trait;

use fibber_core::error::CoreError;
use fibber_core::job::{AcceptedJob, JobIndex};
use fibber_core::ports::JobLog;

use crate::repositories::JobLogRepo;
use crate::DbPool;

/// [`JobLog`] backed by the `job_log` table.
#[derive(Clone)]
pub struct PgJobLog {
    pool: DbPool,
}

impl PgJobLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> CoreError {
    CoreError::LogUnavailable(err.to_string())
}

#[async_trait]
impl JobLog for PgJobLog {
    async fn append(&self, index: JobIndex) -> Result<(), CoreError> {
        let entry = JobLogRepo::append(&self.pool, index.value() as i32)
            .await
            .map_err(unavailable)?;
        tracing::debug!(id = entry.id, number = entry.number, "Job log row appended");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AcceptedJob>, CoreError> {
        let rows = JobLogRepo::list_all(&self.pool).await.map_err(unavailable)?;
        Ok(rows.into_iter().map(AcceptedJob::from).collect())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(unavailable)
    }
}
