//! Batch files describing one complete upload session.
//!
//! ```json
//! {
//!   "employeeId": "EMP001",
//!   "files": ["scans/umowa.pdf"],
//!   "date": "2024-01-15",
//!   "retention": "10_years",
//!   "ranges": [
//!     { "file": 0, "pages": [1, 2, 3], "title": "Umowa", "section": "A" }
//!   ]
//! }
//! ```
//!
//! Relative file paths are resolved against the batch file's directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use eteczka::{
    AttestationKind, CommitReceipt, Config, DocumentType, EmployeeDirectory, FileId, IncomingFile,
    LegalSection, RangeUpdate, Rejection, RetentionPeriod, Summary, UploadWorkflow,
};
use eteczka::sanitize::redact_path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub employee_id: String,
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub ranges: Vec<RangeSpec>,
    /// Applied to every range before per-range values.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub retention: Option<RetentionPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSpec {
    /// Index into `files`.
    pub file: usize,
    pub pages: Vec<u32>,
    pub title: String,
    /// Category to confirm. The suggested one is accepted when absent.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub section: Option<LegalSection>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub retention: Option<RetentionPeriod>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Batch {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
        let mut batch: Batch = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse batch file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for file in &mut batch.files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }

        for spec in &batch.ranges {
            if spec.file >= batch.files.len() {
                bail!(
                    "Range '{}' refers to file #{} but the batch lists {} file(s)",
                    spec.title,
                    spec.file,
                    batch.files.len()
                );
            }
        }

        Ok(batch)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub rejected: Vec<Rejection>,
    pub summary: Summary,
    /// Absent when the run stopped at the preview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<CommitReceipt>,
}

/// Loads `path` and drives a fresh workflow through every step.
pub async fn run(
    config: &Config,
    directory: EmployeeDirectory,
    path: &Path,
    confirm: bool,
) -> Result<RunReport> {
    let batch = Batch::load(path)?;
    let mut workflow = UploadWorkflow::new(config, directory);
    let outcome = drive(&mut workflow, &batch, confirm).await;
    workflow.shutdown();
    outcome
}

async fn drive(workflow: &mut UploadWorkflow, batch: &Batch, confirm: bool) -> Result<RunReport> {
    workflow.select_employee(&batch.employee_id)?;
    workflow.next()?;

    // One call per file keeps batch indices aligned with file ids.
    let mut file_ids: Vec<Option<FileId>> = Vec::with_capacity(batch.files.len());
    let mut rejected = Vec::new();
    for path in &batch.files {
        let incoming = IncomingFile::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut report = workflow.accept_files(vec![incoming])?;
        file_ids.push(report.accepted.pop());
        rejected.append(&mut report.rejected);
    }
    for rejection in &rejected {
        warn!(
            file = %redact_path(Path::new(&rejection.name)),
            reason = %rejection.reason,
            "File skipped"
        );
    }

    workflow.wait_for_processing().await;
    workflow.next()?;

    let mut range_ids = Vec::with_capacity(batch.ranges.len());
    for spec in &batch.ranges {
        let file_id = file_ids
            .get(spec.file)
            .and_then(Option::as_ref)
            .with_context(|| {
                format!("Range '{}' uses file #{} which was rejected", spec.title, spec.file)
            })?;
        workflow.select_pages(file_id, &spec.pages)?;
        let range_id = workflow
            .create_range(&spec.title)
            .with_context(|| format!("Failed to create range '{}'", spec.title))?;
        range_ids.push(range_id);
    }
    workflow.next()?;

    if let (Some(date), Some(retention)) = (batch.date, batch.retention) {
        workflow.bulk_apply(date, retention)?;
    }

    for (spec, range_id) in batch.ranges.iter().zip(&range_ids) {
        match &spec.category {
            Some(category) => workflow.update_range(
                range_id,
                RangeUpdate::ConfirmedCategory(Some(category.clone())),
            )?,
            None => workflow.accept_suggestion(range_id)?,
        }

        let mut updates = Vec::new();
        if let Some(document_type) = spec.document_type {
            updates.push(RangeUpdate::DocumentType(Some(document_type)));
        }
        if let Some(section) = spec.section {
            updates.push(RangeUpdate::Section(Some(section)));
        }
        if let Some(date) = spec.date {
            updates.push(RangeUpdate::Date(Some(date)));
        }
        if let Some(retention) = spec.retention {
            updates.push(RangeUpdate::RetentionPeriod(Some(retention)));
        }
        if let Some(notes) = &spec.notes {
            updates.push(RangeUpdate::Notes(Some(notes.clone())));
        }
        for update in updates {
            workflow.update_range(range_id, update)?;
        }
    }
    workflow.next()?;

    let summary = workflow.summary();
    if !confirm {
        info!("Stopped at preview, pass --confirm to commit");
        return Ok(RunReport {
            rejected,
            summary,
            receipt: None,
        });
    }

    for kind in AttestationKind::ALL {
        workflow.set_attestation(kind, true)?;
    }
    let receipt = workflow.commit().await?;

    Ok(RunReport {
        rejected,
        summary,
        receipt: Some(receipt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eteczka::config::SimulationConfig;
    use tempfile::TempDir;

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.intake.simulation = SimulationConfig {
            min_delay_ms: 10,
            max_delay_ms: 10,
            min_pages: 3,
            max_pages: 3,
        };
        config.commit.delay_ms = 10;
        config
    }

    fn write_batch(dir: &TempDir, json: &str) -> PathBuf {
        std::fs::write(dir.path().join("umowa.pdf"), b"%PDF-1.5 test").unwrap();
        std::fs::write(dir.path().join("notatka.txt"), b"notes").unwrap();
        let path = dir.path().join("batch.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_resolves_relative_files() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(
            &dir,
            r#"{"employeeId": "EMP001", "files": ["umowa.pdf"], "ranges": []}"#,
        );

        let batch = Batch::load(&path).unwrap();
        assert_eq!(batch.files[0], dir.path().join("umowa.pdf"));
    }

    #[test]
    fn test_load_rejects_bad_file_index() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(
            &dir,
            r#"{"employeeId": "EMP001", "files": ["umowa.pdf"],
                "ranges": [{"file": 1, "pages": [1], "title": "Umowa"}]}"#,
        );

        let err = Batch::load(&path).unwrap_err();
        assert!(err.to_string().contains("file #1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_commits_confirmed_batch() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(
            &dir,
            r#"{
                "employeeId": "EMP001",
                "files": ["notatka.txt", "umowa.pdf"],
                "date": "2024-01-15",
                "retention": "10_years",
                "ranges": [
                    {"file": 1, "pages": [1, 2, 3], "title": "Umowa", "section": "A"}
                ]
            }"#,
        );

        let report = run(&fast_config(), EmployeeDirectory::default(), &path, true)
            .await
            .unwrap();

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.summary.total_pages, 3);
        let receipt = report.receipt.unwrap();
        assert_eq!(receipt.employee_id, "EMP001");
        assert_eq!(receipt.document_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_without_confirm_stops_at_preview() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(
            &dir,
            r#"{"employeeId": "EMP002", "files": ["umowa.pdf"],
                "ranges": [{"file": 0, "pages": [2], "title": "Aneks", "category": "Aneks do umowy"}]}"#,
        );

        let report = run(&fast_config(), EmployeeDirectory::default(), &path, false)
            .await
            .unwrap();

        assert!(report.receipt.is_none());
        assert_eq!(report.summary.employee_name.as_deref(), Some("Anna Nowak"));
        assert_eq!(report.summary.unsectioned, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_fails_on_range_over_rejected_file() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(
            &dir,
            r#"{"employeeId": "EMP001", "files": ["notatka.txt", "umowa.pdf"],
                "ranges": [{"file": 0, "pages": [1], "title": "Notatka"}]}"#,
        );

        let err = run(&fast_config(), EmployeeDirectory::default(), &path, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
