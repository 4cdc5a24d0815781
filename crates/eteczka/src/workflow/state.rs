use serde::Serialize;
use tracing::debug;

use super::{WorkflowAction, WorkflowEvent, WorkflowStep};
use crate::assign::{self, Progress};
use crate::document::{DocumentRange, FileId, FileStatus, RangeId, UploadedFile};
use crate::employee::Employee;
use crate::error::{GuardViolation, PartitionError, WorkflowError};
use crate::review::{Attestations, CommitStatus, Summary};

/// Everything the wizard knows. Mutated only through [`WorkflowState::apply`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub current_step: WorkflowStep,
    pub selected_employee: Option<Employee>,
    /// Insertion order, regardless of when extraction finishes.
    pub uploaded_files: Vec<UploadedFile>,
    pub document_ranges: Vec<DocumentRange>,
    pub attestations: Attestations,
    pub commit_status: CommitStatus,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, file_id: &FileId) -> Option<&UploadedFile> {
        self.uploaded_files.iter().find(|f| &f.id == file_id)
    }

    pub fn range(&self, range_id: &RangeId) -> Option<&DocumentRange> {
        self.document_ranges.iter().find(|r| &r.id == range_id)
    }

    pub fn processing_count(&self) -> usize {
        self.uploaded_files.iter().filter(|f| f.processing()).count()
    }

    /// Checks whether the wizard may move forward from `step`.
    pub fn guard(&self, step: WorkflowStep) -> Result<(), GuardViolation> {
        match step {
            WorkflowStep::Employee => {
                if self.selected_employee.is_none() {
                    return Err(GuardViolation::NoEmployee);
                }
            }
            WorkflowStep::Upload => {
                if self.uploaded_files.is_empty() {
                    return Err(GuardViolation::NoFiles);
                }
                let count = self.processing_count();
                if count > 0 {
                    return Err(GuardViolation::FilesProcessing { count });
                }
            }
            WorkflowStep::Split => {
                if self.document_ranges.is_empty() {
                    return Err(GuardViolation::NoRanges);
                }
            }
            WorkflowStep::Category => {
                let count = self
                    .document_ranges
                    .iter()
                    .filter(|r| !r.has_confirmed_category())
                    .count();
                if count > 0 {
                    return Err(GuardViolation::UncategorizedRanges { count });
                }
            }
            WorkflowStep::Preview => {}
        }
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        self.current_step.next().is_some() && self.guard(self.current_step).is_ok()
    }

    pub fn category_progress(&self) -> Progress {
        assign::category_progress(&self.document_ranges)
    }

    pub fn metadata_progress(&self) -> Progress {
        assign::metadata_progress(&self.document_ranges)
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(
            self.selected_employee.as_ref(),
            &self.uploaded_files,
            &self.document_ranges,
        )
    }

    /// Fails with [`WorkflowError::WrongStep`] unless the wizard is on `expected`.
    pub fn ensure_step(
        &self,
        operation: &'static str,
        expected: WorkflowStep,
    ) -> Result<(), WorkflowError> {
        if self.current_step != expected {
            return Err(WorkflowError::WrongStep {
                operation,
                expected,
                current: self.current_step,
            });
        }
        Ok(())
    }

    /// Validates and applies one action. On error the state is unchanged.
    pub fn apply(&mut self, action: WorkflowAction) -> Result<Vec<WorkflowEvent>, WorkflowError> {
        use WorkflowAction::*;

        if self.commit_status.is_succeeded() {
            return Err(WorkflowError::AlreadyCommitted);
        }
        if self.commit_status.is_committing() && !action.is_completion() {
            return Err(WorkflowError::CommitInProgress);
        }

        let operation = action.name();

        match action {
            SelectEmployee(employee) => {
                self.ensure_step(operation, WorkflowStep::Employee)?;
                let employee_id = employee.id.clone();
                self.selected_employee = Some(employee);
                Ok(vec![WorkflowEvent::EmployeeSelected { employee_id }])
            }

            ClearEmployee => {
                self.ensure_step(operation, WorkflowStep::Employee)?;
                if self.selected_employee.take().is_none() {
                    return Ok(vec![]);
                }
                Ok(vec![WorkflowEvent::EmployeeCleared])
            }

            AddFile(file) => {
                self.ensure_step(operation, WorkflowStep::Upload)?;
                let file_id = file.id.clone();
                self.uploaded_files.push(file);
                Ok(vec![WorkflowEvent::FileAdded { file_id }])
            }

            FileProcessed { file_id, pages } => {
                let Some(file) = self.processing_file_mut(&file_id) else {
                    debug!(%file_id, "Dropping completion for unknown or settled file");
                    return Ok(vec![]);
                };
                let page_count = pages.len();
                file.pages = pages;
                file.status = FileStatus::Ready;
                Ok(vec![WorkflowEvent::FileReady {
                    file_id,
                    page_count,
                }])
            }

            FileFailed { file_id, reason } => {
                let Some(file) = self.processing_file_mut(&file_id) else {
                    debug!(%file_id, "Dropping failure for unknown or settled file");
                    return Ok(vec![]);
                };
                file.status = FileStatus::Failed {
                    reason: reason.clone(),
                };
                Ok(vec![WorkflowEvent::FileFailed { file_id, reason }])
            }

            RemoveFile(file_id) => {
                let before = self.uploaded_files.len();
                self.uploaded_files.retain(|f| f.id != file_id);
                if self.uploaded_files.len() == before {
                    return Err(WorkflowError::UnknownFile(file_id));
                }
                Ok(vec![WorkflowEvent::FileRemoved { file_id }])
            }

            AddRange(range) => {
                self.ensure_step(operation, WorkflowStep::Split)?;
                if range.title.trim().is_empty() {
                    return Err(PartitionError::EmptyTitle.into());
                }
                let range_id = range.id.clone();
                self.document_ranges.push(range);
                Ok(vec![WorkflowEvent::RangeAdded { range_id }])
            }

            RemoveRange(range_id) => {
                let before = self.document_ranges.len();
                self.document_ranges.retain(|r| r.id != range_id);
                if self.document_ranges.len() == before {
                    return Err(WorkflowError::UnknownRange(range_id));
                }
                Ok(vec![WorkflowEvent::RangeRemoved { range_id }])
            }

            UpdateRange { range_id, update } => {
                self.ensure_step(operation, WorkflowStep::Category)?;
                let field = update.field();
                let range = self.range_mut(&range_id)?;
                update.apply(range)?;
                Ok(vec![WorkflowEvent::RangeUpdated { range_id, field }])
            }

            AcceptSuggestion(range_id) => {
                self.ensure_step(operation, WorkflowStep::Category)?;
                let range = self.range_mut(&range_id)?;
                if !assign::accept_suggestion(range) {
                    return Ok(vec![]);
                }
                let category = range.confirmed_category.clone().unwrap_or_default();
                Ok(vec![WorkflowEvent::SuggestionAccepted { range_id, category }])
            }

            BulkApplyMetadata { date, retention } => {
                self.ensure_step(operation, WorkflowStep::Category)?;
                assign::bulk_apply(&mut self.document_ranges, date, retention);
                Ok(vec![WorkflowEvent::MetadataBulkApplied {
                    ranges: self.document_ranges.len(),
                }])
            }

            SetAttestation { kind, value } => {
                self.ensure_step(operation, WorkflowStep::Preview)?;
                self.attestations.set(kind, value);
                Ok(vec![WorkflowEvent::AttestationChanged { kind, value }])
            }

            Next => {
                let from = self.current_step;
                let to = from.next().ok_or(WorkflowError::AtLastStep)?;
                self.guard(from)
                    .map_err(|reason| WorkflowError::Blocked { step: from, reason })?;
                self.current_step = to;
                Ok(vec![WorkflowEvent::StepChanged { from, to }])
            }

            Previous => {
                let from = self.current_step;
                let to = from.previous().ok_or(WorkflowError::AtFirstStep)?;
                self.current_step = to;

                let mut events = vec![WorkflowEvent::StepChanged { from, to }];
                if from == WorkflowStep::Preview {
                    self.attestations = Attestations::default();
                    self.commit_status = CommitStatus::Idle;
                    events.push(WorkflowEvent::AttestationsReset);
                }
                Ok(events)
            }

            CommitStarted => {
                self.ensure_step(operation, WorkflowStep::Preview)?;
                if !self.attestations.all_given() {
                    return Err(WorkflowError::AttestationsMissing);
                }
                self.commit_status = CommitStatus::Committing;
                Ok(vec![WorkflowEvent::CommitStarted])
            }

            CommitSucceeded(receipt) => {
                if !self.commit_status.is_committing() {
                    debug!("Ignoring commit result without a commit in progress");
                    return Ok(vec![]);
                }
                let batch_id = receipt.batch_id.clone();
                self.commit_status = CommitStatus::Succeeded { receipt };
                Ok(vec![WorkflowEvent::CommitSucceeded { batch_id }])
            }

            CommitFailed { error } => {
                if !self.commit_status.is_committing() {
                    debug!("Ignoring commit result without a commit in progress");
                    return Ok(vec![]);
                }
                self.commit_status = CommitStatus::Failed {
                    error: error.clone(),
                };
                Ok(vec![WorkflowEvent::CommitFailed { error }])
            }
        }
    }

    fn processing_file_mut(&mut self, file_id: &FileId) -> Option<&mut UploadedFile> {
        self.uploaded_files
            .iter_mut()
            .find(|f| &f.id == file_id && f.processing())
    }

    fn range_mut(&mut self, range_id: &RangeId) -> Result<&mut DocumentRange, WorkflowError> {
        self.document_ranges
            .iter_mut()
            .find(|r| &r.id == range_id)
            .ok_or_else(|| WorkflowError::UnknownRange(range_id.clone()))
    }
}
