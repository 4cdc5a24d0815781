use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::Instrument;

use super::{ArchiveSink, CommitPayload};
use crate::error::CommitError;
use crate::review::CommitReceipt;
use crate::sanitize::{hash_value, redact_path};

const MANIFEST_FILE: &str = "manifest.json";

/// Writes each batch to `<output>/<employee-id>/<timestamp>/` as a
/// `manifest.json` plus the source files. A second batch in the same second
/// gets `<timestamp>_2/`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    output_directory: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// `<data dir>/eteczka/archive`, or a relative directory when the
    /// platform has no data directory.
    pub fn default_output_directory() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("eteczka").join("archive"))
            .unwrap_or_else(|| PathBuf::from("eteczka-archive"))
    }

    fn write_batch(&self, payload: &CommitPayload) -> Result<PathBuf, CommitError> {
        let employee_dir = self
            .output_directory
            .join(safe_component(&payload.employee.id));
        std::fs::create_dir_all(&employee_dir).map_err(|e| CommitError::CreateDirectory {
            path: employee_dir.clone(),
            source: e,
        })?;

        let timestamp = payload.created_at.format("%Y%m%dT%H%M%S").to_string();
        let batch_dir = create_dir_exclusive(&employee_dir, &timestamp)?;

        fill_or_remove(&batch_dir, |dir| write_contents(dir, payload))?;
        Ok(batch_dir)
    }
}

/// Runs `fill` on a freshly created batch directory and deletes the
/// directory again when it fails, so no half-written batch is left behind.
fn fill_or_remove<F>(batch_dir: &Path, fill: F) -> Result<(), CommitError>
where
    F: FnOnce(&Path) -> Result<(), CommitError>,
{
    let result = fill(batch_dir);
    if result.is_err() {
        if let Err(e) = std::fs::remove_dir_all(batch_dir) {
            tracing::warn!(
                dir = %redact_path(batch_dir),
                error = %e,
                "Failed to remove incomplete batch directory"
            );
        }
    }
    result
}

fn write_contents(batch_dir: &Path, payload: &CommitPayload) -> Result<(), CommitError> {
    let manifest = serde_json::to_vec_pretty(payload)?;
    write_exclusive(batch_dir, MANIFEST_FILE, &manifest)?;

    for entry in &payload.files {
        let Some(blob) = payload.blobs.get(&entry.id) else {
            continue;
        };
        let path = write_exclusive(batch_dir, &safe_component(&entry.name), blob)?;
        tracing::debug!(file = %redact_path(&path), bytes = blob.len(), "Stored source file");
    }

    Ok(())
}

#[async_trait]
impl ArchiveSink for DirectorySink {
    async fn store(&self, payload: &CommitPayload) -> Result<CommitReceipt, CommitError> {
        let span = tracing::info_span!(
            "commit.directory",
            employee = %hash_value(&payload.employee.id),
            batch_id = %payload.batch_id,
        );

        async {
            let sink = self.clone();
            let owned = payload.clone();
            let batch_dir = tokio::task::spawn_blocking(move || sink.write_batch(&owned))
                .await
                .map_err(|e| CommitError::Rejected(format!("archive task failed: {}", e)))??;

            tracing::info!(
                documents = payload.documents.len(),
                "Batch written to archive directory"
            );
            Ok(payload.receipt(Some(batch_dir.display().to_string())))
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

/// Keeps only the final path component so names cannot escape the batch
/// directory.
fn safe_component(name: &str) -> String {
    let component = redact_path(Path::new(name));
    if component == ".." || component.starts_with('<') {
        "unnamed".to_string()
    } else {
        component
    }
}

/// Creates a fresh `dir/name` directory, falling back to `name_2`,
/// `name_3`, ... when taken. An existing directory is never reused.
fn create_dir_exclusive(dir: &Path, name: &str) -> Result<PathBuf, CommitError> {
    for counter in 1..=1000 {
        let candidate = if counter == 1 {
            name.to_string()
        } else {
            format!("{}_{}", name, counter)
        };
        let path = dir.join(&candidate);

        match std::fs::create_dir(&path) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(CommitError::CreateDirectory { path, source: e }),
        }
    }

    Err(CommitError::FileExists(dir.join(name)))
}

/// Creates `filename` in `dir` without overwriting anything, falling back
/// to `name_2.ext`, `name_3.ext`, ... when taken.
fn write_exclusive(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, CommitError> {
    let (base, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => (&filename[..dot], Some(&filename[dot..])),
        _ => (filename, None),
    };

    for counter in 1..=1000 {
        let candidate = if counter == 1 {
            filename.to_string()
        } else {
            match ext {
                Some(ext) => format!("{}_{}{}", base, counter, ext),
                None => format!("{}_{}", base, counter),
            }
        };
        let path = dir.join(&candidate);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut file) => {
                file.write_all(content).map_err(|e| CommitError::WriteFile {
                    path: path.clone(),
                    source: e,
                })?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(CommitError::WriteFile { path, source: e }),
        }
    }

    Err(CommitError::FileExists(dir.join(filename)))
}
