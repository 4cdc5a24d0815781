//! Read-only snapshot of workflow state for display.
//!
//! Consumers never mutate this; they receive new snapshots via the watch
//! channel returned by [`super::UploadWorkflow::subscribe`].

use serde::Serialize;

use super::{step_progress, StepStatus, WorkflowState, WorkflowStep};
use crate::assign::Progress;
use crate::document::{DocumentRange, PageRef, UploadedFile};
use crate::employee::Employee;
use crate::error::GuardViolation;
use crate::review::{Attestations, CommitStatus, Summary};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    /// Number of actions applied so far. Rejected actions do not count.
    /// Selection changes publish a new snapshot with the same value.
    pub seq: u64,
    pub current_step: WorkflowStep,
    pub steps: Vec<(WorkflowStep, StepStatus)>,
    /// Why `Next` would fail right now, if it would.
    pub blocked_by: Option<GuardViolation>,
    pub selected_employee: Option<Employee>,
    pub uploaded_files: Vec<UploadedFile>,
    pub document_ranges: Vec<DocumentRange>,
    pub selected_pages: Vec<PageRef>,
    pub category_progress: Progress,
    pub metadata_progress: Progress,
    pub attestations: Attestations,
    pub commit_status: CommitStatus,
    pub summary: Summary,
}

impl WorkflowSnapshot {
    pub fn capture(seq: u64, state: &WorkflowState, selected_pages: Vec<PageRef>) -> Self {
        Self {
            seq,
            current_step: state.current_step,
            steps: step_progress(state.current_step),
            blocked_by: state.guard(state.current_step).err(),
            selected_employee: state.selected_employee.clone(),
            uploaded_files: state.uploaded_files.clone(),
            document_ranges: state.document_ranges.clone(),
            selected_pages,
            category_progress: state.category_progress(),
            metadata_progress: state.metadata_progress(),
            attestations: state.attestations,
            commit_status: state.commit_status.clone(),
            summary: state.summary(),
        }
    }
}

impl From<&WorkflowState> for WorkflowSnapshot {
    fn from(state: &WorkflowState) -> Self {
        Self::capture(0, state, Vec::new())
    }
}
