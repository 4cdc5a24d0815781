use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{DocumentRange, FileId, UploadedFile};
use crate::employee::Employee;
use crate::error::CommitError;
use crate::review::CommitReceipt;

/// Manifest entry for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub page_count: usize,
}

/// Everything handed to the archive in one commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPayload {
    pub batch_id: String,
    pub created_at: DateTime<Utc>,
    pub employee: Employee,
    pub documents: Vec<DocumentRange>,
    pub files: Vec<FileEntry>,
    /// Raw source bytes keyed by file id. Not part of the manifest.
    #[serde(skip)]
    pub blobs: HashMap<FileId, Arc<[u8]>>,
}

impl CommitPayload {
    /// Assembles the payload, refusing ranges whose source file is gone.
    pub fn build(
        employee: &Employee,
        files: &[UploadedFile],
        ranges: &[DocumentRange],
    ) -> Result<Self, CommitError> {
        for range in ranges {
            if let Some(missing) = range
                .source_files
                .iter()
                .find(|id| !files.iter().any(|f| &f.id == *id))
            {
                return Err(CommitError::DanglingRange {
                    range_id: range.id.clone(),
                    file_id: missing.clone(),
                });
            }
        }

        Ok(Self {
            batch_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            employee: employee.clone(),
            documents: ranges.to_vec(),
            files: files
                .iter()
                .map(|f| FileEntry {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    media_type: f.media_type.clone(),
                    size_bytes: f.size_bytes,
                    page_count: f.pages.len(),
                })
                .collect(),
            blobs: files
                .iter()
                .map(|f| (f.id.clone(), Arc::clone(&f.blob)))
                .collect(),
        })
    }

    pub fn total_pages(&self) -> u32 {
        self.documents.iter().map(DocumentRange::page_count).sum()
    }

    pub fn receipt(&self, location: Option<String>) -> CommitReceipt {
        CommitReceipt {
            batch_id: self.batch_id.clone(),
            employee_id: self.employee.id.clone(),
            document_count: self.documents.len(),
            total_pages: self.total_pages(),
            committed_at: Utc::now(),
            location,
        }
    }
}
