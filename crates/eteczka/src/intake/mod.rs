//! File intake: screening, background page extraction and progress.

pub mod extractor;
pub mod media;
pub mod progress;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use crate::config::schema::{ExtractorKind, IntakeConfig};
use crate::document::{FileId, UploadedFile};
use crate::error::ExtractError;
use crate::sanitize::redact_path;
use crate::workflow::WorkflowAction;

pub use extractor::{PageExtractor, PdfExtractor, SimulatedExtractor};
pub use media::{MediaFilter, RejectReason};
pub use progress::{FilePhase, FileProgressBroadcaster, FileProgressEvent, FileProgressTracker};

/// A file handed to the workflow by the caller.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    /// Declared media type. Guessed from `name` when absent.
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: &str, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            media_type: media_type.map(str::to_string),
            bytes,
        }
    }

    /// Reads a file from disk, leaving the media type to be guessed.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self {
            name: redact_path(path),
            media_type: None,
            bytes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub name: String,
    pub reason: RejectReason,
}

/// Outcome of handing a batch of files to intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeReport {
    pub accepted: Vec<FileId>,
    pub rejected: Vec<Rejection>,
}

impl IntakeReport {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

/// Builds the extractor selected in the config.
pub fn extractor_from_config(config: &IntakeConfig) -> Arc<dyn PageExtractor> {
    match config.extractor {
        ExtractorKind::Simulated => Arc::new(SimulatedExtractor::new(config.simulation.clone())),
        ExtractorKind::Pdf => Arc::new(PdfExtractor::new()),
    }
}

/// Screens incoming files and runs extraction in background tasks.
///
/// Completed extractions come back as [`WorkflowAction`]s so that only the
/// owner of the workflow state ever mutates it.
pub struct FileIntake {
    filter: MediaFilter,
    extractor: Arc<dyn PageExtractor>,
    progress: FileProgressBroadcaster,
    completions_tx: mpsc::UnboundedSender<WorkflowAction>,
    completions_rx: mpsc::UnboundedReceiver<WorkflowAction>,
    tasks: HashMap<FileId, CancellationToken>,
    shutdown: CancellationToken,
}

impl FileIntake {
    pub fn new(
        filter: MediaFilter,
        extractor: Arc<dyn PageExtractor>,
        progress: FileProgressBroadcaster,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            filter,
            extractor,
            progress,
            completions_tx,
            completions_rx,
            tasks: HashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Splits a batch into files ready to be queued and rejections.
    /// Nothing is started here.
    pub fn screen(&self, files: Vec<IncomingFile>) -> (Vec<UploadedFile>, Vec<Rejection>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for file in files {
            match self.filter.check(
                &file.name,
                file.media_type.as_deref(),
                file.bytes.len() as u64,
            ) {
                Ok(media_type) => {
                    accepted.push(UploadedFile::pending(
                        FileId::generate(),
                        &file.name,
                        &media_type,
                        Arc::from(file.bytes),
                    ));
                }
                Err(reason) => {
                    warn!(
                        file = %redact_path(Path::new(&file.name)),
                        %reason,
                        "Rejected incoming file"
                    );
                    rejected.push(Rejection {
                        name: file.name,
                        reason,
                    });
                }
            }
        }

        (accepted, rejected)
    }

    /// Spawns the extraction task for a file already added to the state.
    pub fn start(&mut self, file: &UploadedFile) {
        let token = self.shutdown.child_token();
        self.tasks.insert(file.id.clone(), token.clone());

        let tracker = self.progress.start_file(&file.id, &file.name);
        let extractor = Arc::clone(&self.extractor);
        let tx = self.completions_tx.clone();
        let file_id = file.id.clone();
        let name = file.name.clone();
        let media_type = file.media_type.clone();
        let blob = Arc::clone(&file.blob);

        let span = tracing::info_span!(
            "intake.extract",
            file_id = %file_id,
            media_type = %media_type
        );

        tokio::spawn(
            async move {
                tracker.update_phase(FilePhase::Extracting, "Extracting pages...");

                // A panicking extractor must still produce a completion, so it
                // runs in its own task.
                let job_id = file_id.clone();
                let mut job = tokio::spawn(
                    async move {
                        extractor
                            .extract(&job_id, &name, &media_type, blob)
                            .await
                    }
                    .in_current_span(),
                );

                tokio::select! {
                    _ = token.cancelled() => {
                        job.abort();
                        debug!("Extraction cancelled");
                        tracker.cancelled();
                    }
                    joined = &mut job => {
                        let result = joined
                            .unwrap_or_else(|e| Err(ExtractError::TaskFailed(e.to_string())));
                        let action = match result {
                            Ok(pages) => {
                                info!(pages = pages.len(), "Extraction finished");
                                tracker.ready(pages.len());
                                WorkflowAction::FileProcessed { file_id, pages }
                            }
                            Err(e) => {
                                warn!(error = %e, "Extraction failed");
                                tracker.failed(&e.to_string());
                                WorkflowAction::FileFailed {
                                    file_id,
                                    reason: e.to_string(),
                                }
                            }
                        };
                        // The receiver lives as long as this intake
                        let _ = tx.send(action);
                    }
                }
            }
            .instrument(span),
        );
    }

    /// Cancels the extraction task for a file. Returns false when no task was
    /// running for it.
    pub fn cancel(&mut self, file_id: &FileId) -> bool {
        match self.tasks.remove(file_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Forgets the task of a file whose completion has been applied.
    pub fn finished(&mut self, file_id: &FileId) {
        self.tasks.remove(file_id);
    }

    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Returns a completion that has already arrived, without waiting.
    pub fn try_next_completion(&mut self) -> Option<WorkflowAction> {
        self.completions_rx.try_recv().ok()
    }

    /// Waits for the next completion.
    pub async fn next_completion(&mut self) -> Option<WorkflowAction> {
        self.completions_rx.recv().await
    }

    pub fn progress(&self) -> &FileProgressBroadcaster {
        &self.progress
    }

    /// Cancels every running task.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.tasks.clear();
    }
}

impl Drop for FileIntake {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
