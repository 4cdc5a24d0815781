//! File processing progress broadcaster for real-time intake status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::document::FileId;

/// Phase of a file's processing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilePhase {
    Queued,
    Extracting,
    Ready,
    Failed,
    Cancelled,
}

impl std::fmt::Display for FilePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilePhase::Queued => write!(f, "Queued"),
            FilePhase::Extracting => write!(f, "Extracting pages"),
            FilePhase::Ready => write!(f, "Ready"),
            FilePhase::Failed => write!(f, "Failed"),
            FilePhase::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Progress event for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProgressEvent {
    pub file_id: FileId,
    pub filename: String,
    pub phase: FilePhase,
    /// Human-readable message describing current activity.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Number of pages found (set when ready).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// Error message (set on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileProgressEvent {
    pub fn new(file_id: &FileId, filename: &str, phase: FilePhase, message: &str) -> Self {
        Self {
            file_id: file_id.clone(),
            filename: filename.to_string(),
            phase,
            message: message.to_string(),
            timestamp: Utc::now(),
            page_count: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            FilePhase::Ready | FilePhase::Failed | FilePhase::Cancelled
        )
    }
}

/// Broadcasts file progress events to any number of subscribers.
#[derive(Clone)]
pub struct FileProgressBroadcaster {
    sender: Arc<broadcast::Sender<FileProgressEvent>>,
}

impl FileProgressBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: FileProgressEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FileProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a tracker for a newly queued file and announces it.
    pub fn start_file(&self, file_id: &FileId, filename: &str) -> FileProgressTracker {
        let tracker = FileProgressTracker {
            file_id: file_id.clone(),
            filename: filename.to_string(),
            sender: Arc::clone(&self.sender),
        };
        tracker.update_phase(FilePhase::Queued, "File queued for processing");
        tracker
    }
}

impl Default for FileProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Tracks progress for a single file.
pub struct FileProgressTracker {
    file_id: FileId,
    filename: String,
    sender: Arc<broadcast::Sender<FileProgressEvent>>,
}

impl FileProgressTracker {
    pub fn update_phase(&self, phase: FilePhase, message: &str) {
        let event = FileProgressEvent::new(&self.file_id, &self.filename, phase, message);
        let _ = self.sender.send(event);
    }

    pub fn ready(&self, page_count: usize) {
        let mut event = FileProgressEvent::new(
            &self.file_id,
            &self.filename,
            FilePhase::Ready,
            "Processing completed",
        );
        event.page_count = Some(page_count);
        let _ = self.sender.send(event);
    }

    pub fn failed(&self, error: &str) {
        let mut event = FileProgressEvent::new(
            &self.file_id,
            &self.filename,
            FilePhase::Failed,
            "Processing failed",
        );
        event.error = Some(error.to_string());
        let _ = self.sender.send(event);
    }

    pub fn cancelled(&self) {
        self.update_phase(FilePhase::Cancelled, "Processing cancelled");
    }
}
