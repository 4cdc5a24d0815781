//! Actions: the only way workflow state changes.

use chrono::NaiveDate;

use crate::assign::RangeUpdate;
use crate::codes::RetentionPeriod;
use crate::document::{DocumentRange, FileId, Page, RangeId, UploadedFile};
use crate::employee::Employee;
use crate::review::{AttestationKind, CommitReceipt};

#[derive(Debug, Clone)]
pub enum WorkflowAction {
    SelectEmployee(Employee),
    ClearEmployee,

    /// Registers an accepted file in the processing state.
    AddFile(UploadedFile),
    /// Extraction finished for a file.
    FileProcessed { file_id: FileId, pages: Vec<Page> },
    /// Extraction could not read a file.
    FileFailed { file_id: FileId, reason: String },
    RemoveFile(FileId),

    AddRange(DocumentRange),
    RemoveRange(RangeId),
    UpdateRange { range_id: RangeId, update: RangeUpdate },
    AcceptSuggestion(RangeId),
    BulkApplyMetadata {
        date: NaiveDate,
        retention: RetentionPeriod,
    },

    SetAttestation { kind: AttestationKind, value: bool },

    Next,
    Previous,

    CommitStarted,
    CommitSucceeded(CommitReceipt),
    CommitFailed { error: String },
}

impl WorkflowAction {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowAction::SelectEmployee(_) => "select_employee",
            WorkflowAction::ClearEmployee => "clear_employee",
            WorkflowAction::AddFile(_) => "add_file",
            WorkflowAction::FileProcessed { .. } => "file_processed",
            WorkflowAction::FileFailed { .. } => "file_failed",
            WorkflowAction::RemoveFile(_) => "remove_file",
            WorkflowAction::AddRange(_) => "add_range",
            WorkflowAction::RemoveRange(_) => "remove_range",
            WorkflowAction::UpdateRange { .. } => "update_range",
            WorkflowAction::AcceptSuggestion(_) => "accept_suggestion",
            WorkflowAction::BulkApplyMetadata { .. } => "bulk_apply_metadata",
            WorkflowAction::SetAttestation { .. } => "set_attestation",
            WorkflowAction::Next => "next",
            WorkflowAction::Previous => "previous",
            WorkflowAction::CommitStarted => "commit_started",
            WorkflowAction::CommitSucceeded(_) => "commit_succeeded",
            WorkflowAction::CommitFailed { .. } => "commit_failed",
        }
    }

    /// Results of background work, accepted on any step.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            WorkflowAction::FileProcessed { .. }
                | WorkflowAction::FileFailed { .. }
                | WorkflowAction::CommitSucceeded(_)
                | WorkflowAction::CommitFailed { .. }
        )
    }
}
