use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::document::{FileId, RangeId};
use crate::workflow::WorkflowStep;

#[derive(Error, Debug)]
pub enum EteczkaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    #[error("Employee directory error: {0}")]
    Directory(#[from] DirectoryError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid suggestion rule #{index}: {reason}")]
    InvalidSuggestion { index: usize, reason: String },
}

/// Why a forward transition is not allowed yet.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardViolation {
    #[error("no employee selected")]
    NoEmployee,

    #[error("no files uploaded")]
    NoFiles,

    #[error("{count} file(s) still processing")]
    FilesProcessing { count: usize },

    #[error("no document ranges defined")]
    NoRanges,

    #[error("{count} range(s) without a confirmed category")]
    UncategorizedRanges { count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Cannot leave step '{step}': {reason}")]
    Blocked {
        step: WorkflowStep,
        reason: GuardViolation,
    },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Already at the last step")]
    AtLastStep,

    #[error("'{operation}' is only available on step '{expected}' (current: '{current}')")]
    WrongStep {
        operation: &'static str,
        expected: WorkflowStep,
        current: WorkflowStep,
    },

    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("Unknown file: {0}")]
    UnknownFile(FileId),

    #[error("Unknown document range: {0}")]
    UnknownRange(RangeId),

    #[error("Cannot create range: {0}")]
    Partition(#[from] PartitionError),

    #[error("Not all attestations have been given")]
    AttestationsMissing,

    #[error("A commit is already in progress")]
    CommitInProgress,

    #[error("Workflow has already been committed")]
    AlreadyCommitted,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("no pages selected")]
    EmptySelection,

    #[error("title is empty")]
    EmptyTitle,

    #[error("pages {start}-{end} overlap existing range '{existing}'")]
    Overlap {
        start: u32,
        end: u32,
        existing: RangeId,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Unsupported media type for extraction: {0}")]
    UnsupportedMedia(String),

    #[error("Extraction task stopped: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Range '{range_id}' references removed file '{file_id}'")]
    DanglingRange { range_id: RangeId, file_id: FileId },

    #[error("Failed to serialize commit payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File already exists: {0}")]
    FileExists(PathBuf),

    #[error("Archive rejected the batch: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read employee directory '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse employee directory: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate employee id: {0}")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, EteczkaError>;
