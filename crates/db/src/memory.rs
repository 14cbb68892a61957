//! In-process job log.

use async_trait::async_trait;
use tokio::sync::RwLock;

use fibber_core::error::CoreError;
use fibber_core::job::{AcceptedJob, JobIndex};
use fibber_core::ports::JobLog;

/// A [`JobLog`] kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryJobLog {
    rows: RwLock<Vec<JobIndex>>,
}

impl MemoryJobLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobLog for MemoryJobLog {
    async fn append(&self, index: JobIndex) -> Result<(), CoreError> {
        self.rows.write().await.push(index);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AcceptedJob>, CoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().copied().map(AcceptedJob::from).collect())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
