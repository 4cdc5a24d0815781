use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn, Instrument};

use super::{WorkflowAction, WorkflowEvent, WorkflowSnapshot, WorkflowState, WorkflowStep};
use crate::assign::RangeUpdate;
use crate::codes::RetentionPeriod;
use crate::commit::{sink_from_config, ArchiveSink, CommitPayload};
use crate::config::schema::Config;
use crate::document::{FileId, PageRef, RangeId};
use crate::employee::{Employee, EmployeeDirectory};
use crate::error::{CommitError, EteczkaError, WorkflowError};
use crate::intake::{
    extractor_from_config, FileIntake, FileProgressBroadcaster, FileProgressEvent, IncomingFile,
    IntakeReport, MediaFilter, PageExtractor,
};
use crate::partition::Partitioner;
use crate::review::{AttestationKind, CommitReceipt, Summary};
use crate::sanitize::hash_value;
use crate::suggest::Suggester;

/// Drives one upload session.
///
/// Owns the state and every stage. Every mutation goes through
/// [`UploadWorkflow::apply`], which logs the resulting events and publishes
/// a fresh [`WorkflowSnapshot`].
pub struct UploadWorkflow {
    state: WorkflowState,
    directory: EmployeeDirectory,
    intake: FileIntake,
    partitioner: Partitioner,
    suggester: Suggester,
    sink: Arc<dyn ArchiveSink>,
    allow_overlapping_ranges: bool,
    snapshot_tx: watch::Sender<WorkflowSnapshot>,
    seq: u64,
}

impl UploadWorkflow {
    /// Builds a workflow with the extractor and sink selected in `config`.
    pub fn new(config: &Config, directory: EmployeeDirectory) -> Self {
        Self::with_parts(
            config,
            directory,
            extractor_from_config(&config.intake),
            sink_from_config(&config.commit),
        )
    }

    pub fn with_parts(
        config: &Config,
        directory: EmployeeDirectory,
        extractor: Arc<dyn PageExtractor>,
        sink: Arc<dyn ArchiveSink>,
    ) -> Self {
        let state = WorkflowState::new();
        let (snapshot_tx, _) = watch::channel(WorkflowSnapshot::from(&state));

        let intake = FileIntake::new(
            MediaFilter::new(
                &config.intake.accepted_media_types,
                config.intake.max_file_size_bytes,
            ),
            extractor,
            FileProgressBroadcaster::default(),
        );

        Self {
            state,
            directory,
            intake,
            partitioner: Partitioner::new(),
            suggester: Suggester::new(config.suggestions.rules.clone()),
            sink,
            allow_overlapping_ranges: config.partition.allow_overlapping_ranges,
            snapshot_tx,
            seq: 0,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn current_step(&self) -> WorkflowStep {
        self.state.current_step
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_progress(&self) -> broadcast::Receiver<FileProgressEvent> {
        self.intake.progress().subscribe()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot::capture(self.seq, &self.state, self.selected_pages())
    }

    /// All mutations go through this method.
    pub fn apply(&mut self, action: WorkflowAction) -> Result<Vec<WorkflowEvent>, WorkflowError> {
        let events = self.apply_unpublished(action)?;
        self.publish();
        Ok(events)
    }

    /// Applies and logs an action without publishing. The caller publishes
    /// once its own follow-up work is done.
    fn apply_unpublished(
        &mut self,
        action: WorkflowAction,
    ) -> Result<Vec<WorkflowEvent>, WorkflowError> {
        let name = action.name();
        debug!(seq = self.seq, action = name, "Applying action");

        let events = match self.state.apply(action) {
            Ok(events) => events,
            Err(e) => {
                warn!(seq = self.seq, action = name, error = %e, "Action rejected");
                return Err(e);
            }
        };

        self.seq += 1;
        let seq = self.seq;
        for event in &events {
            info!(seq, event = ?event.redacted(), "Workflow event");
        }

        Ok(events)
    }

    fn publish(&self) {
        // No subscribers is fine
        let _ = self.snapshot_tx.send(self.snapshot());
    }

    // Employee step

    pub fn search_employees(&self, term: &str) -> Vec<&Employee> {
        self.directory.search(term)
    }

    pub fn select_employee(&mut self, employee_id: &str) -> Result<(), WorkflowError> {
        let employee = self
            .directory
            .find(employee_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownEmployee(employee_id.to_string()))?;
        self.apply(WorkflowAction::SelectEmployee(employee))?;
        Ok(())
    }

    pub fn clear_employee(&mut self) -> Result<(), WorkflowError> {
        self.apply(WorkflowAction::ClearEmployee)?;
        Ok(())
    }

    // Upload step

    /// Screens `files`, registers the accepted ones as processing and starts
    /// their extraction. Rejected files are reported, never queued.
    pub fn accept_files(
        &mut self,
        files: Vec<IncomingFile>,
    ) -> Result<IntakeReport, WorkflowError> {
        self.state.ensure_step("accept_files", WorkflowStep::Upload)?;

        let (accepted, rejected) = self.intake.screen(files);
        let mut report = IntakeReport {
            accepted: Vec::with_capacity(accepted.len()),
            rejected,
        };

        for file in accepted {
            self.intake.start(&file);
            report.accepted.push(file.id.clone());
            self.apply(WorkflowAction::AddFile(file))?;
        }

        Ok(report)
    }

    /// Removes a file and cancels its extraction if still running. Allowed
    /// on any step before commit.
    pub fn remove_file(&mut self, file_id: &FileId) -> Result<(), WorkflowError> {
        self.apply_unpublished(WorkflowAction::RemoveFile(file_id.clone()))?;
        if self.intake.cancel(file_id) {
            debug!(%file_id, "Cancelled extraction of removed file");
        }
        self.partitioner.forget_file(file_id);
        self.publish();
        Ok(())
    }

    /// Applies completions that have already arrived. Returns how many.
    pub fn poll_intake(&mut self) -> usize {
        let mut applied = 0;
        while let Some(action) = self.intake.try_next_completion() {
            self.apply_completion(action);
            applied += 1;
        }
        applied
    }

    /// Applies completions until no file is processing, or until no
    /// extraction task is left to complete one (after [`Self::shutdown`]).
    pub async fn wait_for_processing(&mut self) {
        self.poll_intake();
        while self.state.processing_count() > 0 && self.intake.running() > 0 {
            match self.intake.next_completion().await {
                Some(action) => self.apply_completion(action),
                None => break,
            }
        }
    }

    fn apply_completion(&mut self, action: WorkflowAction) {
        if let WorkflowAction::FileProcessed { file_id, .. }
        | WorkflowAction::FileFailed { file_id, .. } = &action
        {
            self.intake.finished(file_id);
        }
        if let Err(e) = self.apply(action) {
            warn!(error = %e, "Dropped intake completion");
        }
    }

    // Split step

    /// Toggles a page in the selection. Returns whether it is now selected.
    pub fn toggle_page(&mut self, page: PageRef) -> Result<bool, WorkflowError> {
        self.state.ensure_step("toggle_page", WorkflowStep::Split)?;
        if self.state.file(&page.file_id).is_none() {
            return Err(WorkflowError::UnknownFile(page.file_id));
        }
        let selected = self.partitioner.toggle(page);
        self.publish();
        Ok(selected)
    }

    /// Selects the given page numbers of one file, leaving already selected
    /// pages selected.
    pub fn select_pages(
        &mut self,
        file_id: &FileId,
        numbers: &[u32],
    ) -> Result<(), WorkflowError> {
        for &number in numbers {
            let page = PageRef::new(file_id, number);
            if !self.partitioner.is_selected(&page) {
                self.toggle_page(page)?;
            }
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.partitioner.clear();
        self.publish();
    }

    pub fn selected_pages(&self) -> Vec<PageRef> {
        self.partitioner.selected().cloned().collect()
    }

    pub fn can_create_range(&self, title: &str) -> bool {
        self.state.current_step == WorkflowStep::Split && self.partitioner.can_create(title)
    }

    /// Turns the current selection into a range titled `title`.
    pub fn create_range(&mut self, title: &str) -> Result<RangeId, WorkflowError> {
        self.state.ensure_step("create_range", WorkflowStep::Split)?;
        let range = self.partitioner.create_range(
            title,
            &self.state.uploaded_files,
            &self.state.document_ranges,
            &self.suggester,
            self.allow_overlapping_ranges,
        )?;
        let range_id = range.id.clone();
        self.apply(WorkflowAction::AddRange(range))?;
        Ok(range_id)
    }

    pub fn remove_range(&mut self, range_id: &RangeId) -> Result<(), WorkflowError> {
        self.apply(WorkflowAction::RemoveRange(range_id.clone()))?;
        Ok(())
    }

    // Category step

    pub fn update_range(
        &mut self,
        range_id: &RangeId,
        update: RangeUpdate,
    ) -> Result<(), WorkflowError> {
        self.apply(WorkflowAction::UpdateRange {
            range_id: range_id.clone(),
            update,
        })?;
        Ok(())
    }

    pub fn accept_suggestion(&mut self, range_id: &RangeId) -> Result<(), WorkflowError> {
        self.apply(WorkflowAction::AcceptSuggestion(range_id.clone()))?;
        Ok(())
    }

    pub fn bulk_apply(
        &mut self,
        date: NaiveDate,
        retention: RetentionPeriod,
    ) -> Result<(), WorkflowError> {
        self.apply(WorkflowAction::BulkApplyMetadata { date, retention })?;
        Ok(())
    }

    // Preview step

    pub fn set_attestation(
        &mut self,
        kind: AttestationKind,
        value: bool,
    ) -> Result<(), WorkflowError> {
        self.apply(WorkflowAction::SetAttestation { kind, value })?;
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        self.state.summary()
    }

    /// Hands the batch to the archive sink.
    ///
    /// A failed attempt leaves the workflow on the preview step with a
    /// `Failed` status; calling `commit` again retries.
    pub async fn commit(&mut self) -> Result<CommitReceipt, EteczkaError> {
        self.apply(WorkflowAction::CommitStarted)?;

        let employee_hash = self
            .state
            .selected_employee
            .as_ref()
            .map(|e| hash_value(&e.id))
            .unwrap_or_default();
        let span = tracing::info_span!(
            "workflow.commit",
            employee = %employee_hash,
            sink = self.sink.name(),
            documents = self.state.document_ranges.len(),
        );

        let outcome = match self.build_payload() {
            Ok(payload) => self.sink.store(&payload).instrument(span).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(receipt) => {
                self.apply(WorkflowAction::CommitSucceeded(receipt.clone()))?;
                info!(batch_id = %receipt.batch_id, "Commit succeeded");
                Ok(receipt)
            }
            Err(e) => {
                self.apply(WorkflowAction::CommitFailed {
                    error: e.to_string(),
                })?;
                Err(e.into())
            }
        }
    }

    fn build_payload(&self) -> Result<CommitPayload, CommitError> {
        let employee = self
            .state
            .selected_employee
            .as_ref()
            .ok_or_else(|| CommitError::Rejected("no employee selected".to_string()))?;
        CommitPayload::build(
            employee,
            &self.state.uploaded_files,
            &self.state.document_ranges,
        )
    }

    // Navigation

    pub fn next(&mut self) -> Result<WorkflowStep, WorkflowError> {
        self.apply(WorkflowAction::Next)?;
        Ok(self.state.current_step)
    }

    pub fn previous(&mut self) -> Result<WorkflowStep, WorkflowError> {
        self.apply(WorkflowAction::Previous)?;
        Ok(self.state.current_step)
    }

    /// Cancels all running extractions.
    pub fn shutdown(&mut self) {
        self.intake.shutdown();
    }
}
