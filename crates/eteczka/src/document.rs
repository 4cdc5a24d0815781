//! Files, pages and document ranges handled by the upload workflow.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::{DocumentType, LegalSection, RetentionPeriod};

/// Identifier of an uploaded file, unique within a workflow session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a document range.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeId(String);

impl RangeId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RangeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page extracted from an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Unique within the parent file.
    pub id: String,
    /// 1-based, contiguous within the parent file.
    pub number: u32,
    /// Thumbnail reference; empty when no preview was rendered.
    #[serde(default)]
    pub thumbnail: String,
    /// OCR transcript or embedded text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Page {
    pub fn new(file_id: &FileId, number: u32, text: Option<String>) -> Self {
        Self {
            id: page_id(file_id, number),
            number,
            thumbnail: String::new(),
            text,
        }
    }
}

/// Builds the page id used for `number` within `file_id`.
pub fn page_id(file_id: &FileId, number: u32) -> String {
    format!("{}-p{}", file_id, number)
}

/// Points at a page of a specific file. Selections span several files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    pub file_id: FileId,
    pub page_id: String,
}

impl PageRef {
    pub fn new(file_id: &FileId, number: u32) -> Self {
        Self {
            file_id: file_id.clone(),
            page_id: page_id(file_id, number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FileStatus {
    Processing,
    Ready,
    Failed { reason: String },
}

/// A source document accepted by the intake stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: FileId,
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
    #[serde(skip, default = "empty_blob")]
    pub blob: Arc<[u8]>,
    pub pages: Vec<Page>,
    pub status: FileStatus,
}

fn empty_blob() -> Arc<[u8]> {
    Arc::from(Vec::new())
}

impl UploadedFile {
    /// Creates a file in the processing state with no pages yet.
    pub fn pending(id: FileId, name: &str, media_type: &str, blob: Arc<[u8]>) -> Self {
        Self {
            id,
            name: name.to_string(),
            media_type: media_type.to_string(),
            size_bytes: blob.len() as u64,
            blob,
            pages: Vec::new(),
            status: FileStatus::Processing,
        }
    }

    pub fn processing(&self) -> bool {
        matches!(self.status, FileStatus::Processing)
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }
}

/// A named span of pages forming one logical document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRange {
    pub id: RangeId,
    pub start_page: u32,
    pub end_page: u32,
    pub title: String,
    /// Files whose pages were selected when the range was created.
    #[serde(default)]
    pub source_files: Vec<FileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<LegalSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_period: Option<RetentionPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DocumentRange {
    /// Creates a range with no classification. Bounds are swapped if given
    /// in reverse order.
    pub fn new(title: &str, start_page: u32, end_page: u32, source_files: Vec<FileId>) -> Self {
        let (start_page, end_page) = if start_page <= end_page {
            (start_page, end_page)
        } else {
            (end_page, start_page)
        };
        Self {
            id: RangeId::generate(),
            start_page,
            end_page,
            title: title.trim().to_string(),
            source_files,
            suggested_category: None,
            confirmed_category: None,
            document_type: None,
            section: None,
            date: None,
            retention_period: None,
            notes: None,
        }
    }

    /// Number of pages covered by the bounds, including unselected pages in between.
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    pub fn has_confirmed_category(&self) -> bool {
        self.confirmed_category
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    pub fn is_category_complete(&self) -> bool {
        self.has_confirmed_category() && self.section.is_some()
    }

    pub fn is_metadata_complete(&self) -> bool {
        self.date.is_some() && self.retention_period.is_some()
    }

    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start_page <= end && start <= self.end_page
    }
}
