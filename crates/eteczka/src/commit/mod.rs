//! Archive sinks receiving committed batches.

mod directory;
mod payload;
mod simulated;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::schema::{CommitConfig, SinkKind};
use crate::error::CommitError;
use crate::review::CommitReceipt;

pub use directory::DirectorySink;
pub use payload::{CommitPayload, FileEntry};
pub use simulated::SimulatedSink;

/// Destination of a committed batch.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    async fn store(&self, payload: &CommitPayload) -> Result<CommitReceipt, CommitError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

pub fn sink_from_config(config: &CommitConfig) -> Arc<dyn ArchiveSink> {
    match config.sink {
        SinkKind::Simulated => Arc::new(SimulatedSink::new(Duration::from_millis(config.delay_ms))),
        SinkKind::Directory => {
            let output = config
                .output_directory
                .as_ref()
                .map(std::path::PathBuf::from)
                .unwrap_or_else(DirectorySink::default_output_directory);
            Arc::new(DirectorySink::new(output))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_from_config() {
        let simulated = sink_from_config(&CommitConfig::default());
        assert_eq!(simulated.name(), "simulated");

        let directory = sink_from_config(&CommitConfig {
            sink: SinkKind::Directory,
            delay_ms: 0,
            output_directory: Some("/tmp/eteczka".to_string()),
        });
        assert_eq!(directory.name(), "directory");
    }
}
