use std::time::Duration;

use async_trait::async_trait;

use super::{ArchiveSink, CommitPayload};
use crate::error::CommitError;
use crate::review::CommitReceipt;
use crate::sanitize::redact_name;

/// Waits a fixed time and reports success. Nothing is stored.
pub struct SimulatedSink {
    delay: Duration,
}

impl SimulatedSink {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ArchiveSink for SimulatedSink {
    async fn store(&self, payload: &CommitPayload) -> Result<CommitReceipt, CommitError> {
        tokio::time::sleep(self.delay).await;

        tracing::info!(
            batch_id = %payload.batch_id,
            employee = %redact_name(&payload.employee.name),
            documents = payload.documents.len(),
            files = payload.files.len(),
            pages = payload.total_pages(),
            "Simulated archive accepted batch"
        );

        Ok(payload.receipt(None))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
