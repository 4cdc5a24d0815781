//! Events emitted by the reducer after applying an action.
//!
//! These are for logging and notification. Consumers that render state
//! should read [`super::WorkflowSnapshot`] instead.

use serde::Serialize;

use super::WorkflowStep;
use crate::document::{FileId, RangeId};
use crate::review::AttestationKind;
use crate::sanitize::hash_value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WorkflowEvent {
    StepChanged { from: WorkflowStep, to: WorkflowStep },
    EmployeeSelected { employee_id: String },
    EmployeeCleared,
    FileAdded { file_id: FileId },
    FileReady { file_id: FileId, page_count: usize },
    FileFailed { file_id: FileId, reason: String },
    FileRemoved { file_id: FileId },
    RangeAdded { range_id: RangeId },
    RangeRemoved { range_id: RangeId },
    RangeUpdated { range_id: RangeId, field: &'static str },
    SuggestionAccepted { range_id: RangeId, category: String },
    MetadataBulkApplied { ranges: usize },
    AttestationChanged { kind: AttestationKind, value: bool },
    /// Attestations were cleared after leaving the preview step.
    AttestationsReset,
    CommitStarted,
    CommitSucceeded { batch_id: String },
    CommitFailed { error: String },
}

impl WorkflowEvent {
    /// Copy safe to write to logs. Employee ids are replaced by their hash.
    pub fn redacted(&self) -> WorkflowEvent {
        match self {
            WorkflowEvent::EmployeeSelected { employee_id } => WorkflowEvent::EmployeeSelected {
                employee_id: hash_value(employee_id),
            },
            other => other.clone(),
        }
    }
}
