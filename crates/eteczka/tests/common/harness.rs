//! Test harness for driving a complete upload session.
//!
//! The `TestHarness` wraps an `UploadWorkflow` built with scripted
//! extraction and a recording archive, and offers shortcuts that walk the
//! wizard to a given step.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use eteczka::assign::RangeUpdate;
use eteczka::codes::LegalSection;
use eteczka::config::schema::Config;
use eteczka::document::{FileId, RangeId};
use eteczka::employee::EmployeeDirectory;
use eteczka::intake::IncomingFile;
use eteczka::review::AttestationKind;
use eteczka::workflow::{UploadWorkflow, WorkflowStep};

use super::builders::{pdf_file, ConfigBuilder, RecordingSink, ScriptedExtractor};

pub struct TestHarness {
    pub workflow: UploadWorkflow,
    pub sink: Arc<RecordingSink>,
    /// Scratch space for sinks writing to disk.
    temp_dir: TempDir,
}

impl TestHarness {
    /// Default config, scripted extraction (3 pages per file) and a
    /// recording archive.
    pub fn new() -> Self {
        Self::with(
            ConfigBuilder::new().build(),
            ScriptedExtractor::new(),
            RecordingSink::new(),
        )
    }

    pub fn with(config: Config, extractor: ScriptedExtractor, sink: RecordingSink) -> Self {
        let sink = Arc::new(sink);
        let workflow = UploadWorkflow::with_parts(
            &config,
            EmployeeDirectory::default(),
            Arc::new(extractor),
            sink.clone(),
        );
        Self {
            workflow,
            sink,
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Selects Jan Kowalski and moves to the upload step.
    pub fn to_upload(&mut self) {
        self.workflow
            .select_employee("EMP001")
            .expect("select employee");
        self.workflow.next().expect("advance to upload");
    }

    /// Uploads `files`, waits for extraction and moves to the split step.
    pub async fn to_split(&mut self, files: Vec<IncomingFile>) -> Vec<FileId> {
        self.to_upload();
        let report = self.workflow.accept_files(files).expect("accept files");
        self.workflow.wait_for_processing().await;
        self.workflow.next().expect("advance to split");
        report.accepted
    }

    /// Creates a range from the given pages of one file.
    pub fn range_from(&mut self, file_id: &FileId, pages: &[u32], title: &str) -> RangeId {
        self.workflow
            .select_pages(file_id, pages)
            .expect("select pages");
        self.workflow.create_range(title).expect("create range")
    }

    /// One uploaded PDF, one categorized range over pages 1-3, all
    /// attestations given, sitting on the preview step.
    pub async fn to_preview(&mut self) -> (FileId, RangeId) {
        let files = self.to_split(vec![pdf_file("umowa.pdf")]).await;
        let file_id = files[0].clone();
        let range_id = self.range_from(&file_id, &[1, 2, 3], "Umowa");
        self.workflow.next().expect("advance to category");

        self.workflow
            .update_range(
                &range_id,
                RangeUpdate::ConfirmedCategory(Some("contract".to_string())),
            )
            .expect("confirm category");
        self.workflow
            .update_range(&range_id, RangeUpdate::Section(Some(LegalSection::A)))
            .expect("set section");
        self.workflow.next().expect("advance to preview");
        assert_eq!(self.workflow.current_step(), WorkflowStep::Preview);

        self.attest_all();
        (file_id, range_id)
    }

    pub fn attest_all(&mut self) {
        for kind in AttestationKind::ALL {
            self.workflow
                .set_attestation(kind, true)
                .expect("set attestation");
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
