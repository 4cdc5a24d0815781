//! Builders and test doubles for creating workflows programmatically.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lopdf::{dictionary, Document, Object, Stream};

use eteczka::commit::{ArchiveSink, CommitPayload};
use eteczka::config::schema::{
    CommitConfig, Config, ExtractorKind, SimulationConfig, SinkKind, SuggestionRule,
};
use eteczka::document::{FileId, Page};
use eteczka::error::{CommitError, ExtractError};
use eteczka::intake::{IncomingFile, PageExtractor};
use eteczka::review::CommitReceipt;

/// Builder for creating `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Defaults with a fast, deterministic simulation.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.intake.simulation = SimulationConfig {
            min_delay_ms: 100,
            max_delay_ms: 100,
            min_pages: 3,
            max_pages: 3,
        };
        config.commit.delay_ms = 500;
        Self { config }
    }

    pub fn allow_overlapping_ranges(mut self, allow: bool) -> Self {
        self.config.partition.allow_overlapping_ranges = allow;
        self
    }

    pub fn accepted_media_types(mut self, types: &[&str]) -> Self {
        self.config.intake.accepted_media_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.intake.max_file_size_bytes = Some(bytes);
        self
    }

    pub fn pdf_extractor(mut self) -> Self {
        self.config.intake.extractor = ExtractorKind::Pdf;
        self
    }

    pub fn directory_sink(mut self, output: &Path) -> Self {
        self.config.commit = CommitConfig {
            sink: SinkKind::Directory,
            delay_ms: 0,
            output_directory: Some(output.display().to_string()),
        };
        self
    }

    pub fn rule(mut self, keyword: &str, category: &str) -> Self {
        self.config
            .suggestions
            .rules
            .insert(0, SuggestionRule::keyword(keyword, category));
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn pdf_file(name: &str) -> IncomingFile {
    IncomingFile::new(name, Some("application/pdf"), b"%PDF-1.5 test".to_vec())
}

pub fn png_file(name: &str) -> IncomingFile {
    IncomingFile::new(name, Some("image/png"), b"\x89PNG\r\n".to_vec())
}

pub fn text_file(name: &str) -> IncomingFile {
    IncomingFile::new(name, Some("text/plain"), b"plain text".to_vec())
}

/// Builds an in-memory PDF with one page per entry of `texts`.
pub fn pdf_bytes(texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in texts {
        let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize test PDF");
    bytes
}

#[derive(Clone, Copy, PartialEq)]
enum Outcome {
    Pages,
    Error,
    Panic,
}

struct Script {
    pages: u32,
    delay: Duration,
    text: Option<String>,
    outcome: Outcome,
}

/// Extractor with per-file page counts, delays and texts, keyed by file name.
pub struct ScriptedExtractor {
    scripts: HashMap<String, Script>,
    default_pages: u32,
    default_delay: Duration,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_pages: 3,
            default_delay: Duration::from_millis(50),
        }
    }

    pub fn file(mut self, name: &str, pages: u32, delay_ms: u64, text: Option<&str>) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                pages,
                delay: Duration::from_millis(delay_ms),
                text: text.map(str::to_string),
                outcome: Outcome::Pages,
            },
        );
        self
    }

    pub fn failing(mut self, name: &str, delay_ms: u64) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                pages: 0,
                delay: Duration::from_millis(delay_ms),
                text: None,
                outcome: Outcome::Error,
            },
        );
        self
    }

    /// The extractor panics for `name` after the delay.
    pub fn panicking(mut self, name: &str, delay_ms: u64) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                pages: 0,
                delay: Duration::from_millis(delay_ms),
                text: None,
                outcome: Outcome::Panic,
            },
        );
        self
    }
}

impl Default for ScriptedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        file_id: &FileId,
        name: &str,
        _media_type: &str,
        _blob: Arc<[u8]>,
    ) -> Result<Vec<Page>, ExtractError> {
        let (pages, delay, text, outcome) = match self.scripts.get(name) {
            Some(s) => (s.pages, s.delay, s.text.clone(), s.outcome),
            None => (self.default_pages, self.default_delay, None, Outcome::Pages),
        };

        tokio::time::sleep(delay).await;

        match outcome {
            Outcome::Pages => {}
            Outcome::Error => {
                return Err(ExtractError::PdfProcessing(format!("{} is corrupted", name)))
            }
            Outcome::Panic => panic!("extractor crashed on {}", name),
        }

        Ok((1..=pages)
            .map(|n| Page::new(file_id, n, text.clone()))
            .collect())
    }
}

/// Archive double that fails a configurable number of times, then records
/// every payload it accepts.
pub struct RecordingSink {
    failures_left: AtomicUsize,
    stored: Mutex<Vec<CommitPayload>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::failing(0)
    }

    pub fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
            stored: Mutex::new(Vec::new()),
        }
    }

    pub fn stored(&self) -> Vec<CommitPayload> {
        self.stored.lock().unwrap().clone()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiveSink for RecordingSink {
    async fn store(&self, payload: &CommitPayload) -> Result<CommitReceipt, CommitError> {
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(CommitError::Rejected("archive unavailable".to_string()));
        }

        self.stored.lock().unwrap().push(payload.clone());
        Ok(payload.receipt(Some("memory".to_string())))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
