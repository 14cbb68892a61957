//! Submission gateway: validate, then publish the job in three steps.
//!
//! The steps are independent writes to independent systems and are not
//! transactional. Each can fail on its own; the first failure aborts the
//! remaining steps and leaves the earlier ones in place:
//!
//! | Fails at    | Left behind                                      |
//! |-------------|--------------------------------------------------|
//! | placeholder | nothing                                          |
//! | publish     | placeholder, never overwritten                   |
//! | append      | placeholder, and a worker may already be running |

use std::fmt;
use std::sync::Arc;

use fibber_core::error::CoreError;
use fibber_core::job::{JobIndex, SlotValue};
use fibber_core::ports::{EventChannel, JobLog, StateStore};

/// One side effect of a submission, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStep {
    Placeholder,
    Publish,
    Append,
}

impl fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmissionStep::Placeholder => "placeholder",
            SubmissionStep::Publish => "publish",
            SubmissionStep::Append => "append",
        })
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub index: JobIndex,
    /// Subscribers that received the publish. Zero means the job will stay
    /// pending forever.
    pub notified: usize,
}

/// Accepts jobs and performs the submission side effects.
pub struct SubmissionGateway {
    store: Arc<dyn StateStore>,
    channel: Arc<dyn EventChannel>,
    log: Arc<dyn JobLog>,
}

impl SubmissionGateway {
    pub fn new(
        store: Arc<dyn StateStore>,
        channel: Arc<dyn EventChannel>,
        log: Arc<dyn JobLog>,
    ) -> Self {
        Self {
            store,
            channel,
            log,
        }
    }

    /// Validate `raw` and run placeholder, publish, append in that order.
    ///
    /// Validation failures happen before any side effect.
    pub async fn submit(&self, raw: &str) -> Result<Accepted, CoreError> {
        let index = JobIndex::parse(raw)?;

        self.store
            .set(index, SlotValue::Pending)
            .await
            .map_err(|e| step_failed(SubmissionStep::Placeholder, index, e))?;

        let notified = self
            .channel
            .publish(index)
            .await
            .map_err(|e| step_failed(SubmissionStep::Publish, index, e))?;
        if notified == 0 {
            tracing::warn!(%index, "No worker subscribed, index will stay pending");
        }

        self.log
            .append(index)
            .await
            .map_err(|e| step_failed(SubmissionStep::Append, index, e))?;

        tracing::info!(%index, notified, "Job accepted");
        Ok(Accepted { index, notified })
    }
}

fn step_failed(step: SubmissionStep, index: JobIndex, err: CoreError) -> CoreError {
    tracing::error!(%step, %index, error = %err, "Submission aborted");
    err
}
