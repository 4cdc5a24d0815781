//! Shared test utilities for eteczka integration tests.
//!
//! This module provides:
//! - `TestHarness` driving an `UploadWorkflow` with scripted extraction and archive
//! - Builders for configs, incoming files and in-memory PDFs

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
