use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub commit: CommitConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            intake: IntakeConfig::default(),
            partition: PartitionConfig::default(),
            suggestions: SuggestionsConfig::default(),
            commit: CommitConfig::default(),
            directory: DirectoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Media types accepted by intake. `type/*` matches any subtype.
    #[serde(default = "default_accepted_media_types")]
    pub accepted_media_types: Vec<String>,
    #[serde(default)]
    pub max_file_size_bytes: Option<u64>,
    #[serde(default)]
    pub extractor: ExtractorKind,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_accepted_media_types() -> Vec<String> {
    vec!["application/pdf".to_string(), "image/*".to_string()]
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            accepted_media_types: default_accepted_media_types(),
            max_file_size_bytes: None,
            extractor: ExtractorKind::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    #[default]
    Simulated,
    Pdf,
}

/// Bounds for the simulated OCR/pagination step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_min_pages")]
    pub min_pages: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_min_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    3000
}

fn default_min_pages() -> u32 {
    1
}

fn default_max_pages() -> u32 {
    10
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            min_pages: default_min_pages(),
            max_pages: default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Whether two ranges may share page numbers.
    #[serde(default = "default_true")]
    pub allow_overlapping_ranges: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            allow_overlapping_ranges: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    #[serde(default = "default_suggestion_rules")]
    pub rules: Vec<SuggestionRule>,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            rules: default_suggestion_rules(),
        }
    }
}

/// Maps page text to a suggested category. Exactly one of `keyword` or
/// `pattern` is expected; `keyword` is matched against lowercased text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub category: String,
}

impl SuggestionRule {
    pub fn keyword(keyword: &str, category: &str) -> Self {
        Self {
            keyword: Some(keyword.to_string()),
            pattern: None,
            category: category.to_string(),
        }
    }

    pub fn pattern(pattern: &str, category: &str) -> Self {
        Self {
            keyword: None,
            pattern: Some(pattern.to_string()),
            category: category.to_string(),
        }
    }
}

pub fn default_suggestion_rules() -> Vec<SuggestionRule> {
    vec![
        SuggestionRule::keyword("aneks", "Aneks do umowy"),
        SuggestionRule::keyword("umowa", "Umowa o pracę"),
        SuggestionRule::keyword("rodo", "Oświadczenie RODO"),
        SuggestionRule::keyword("świadectwo", "Świadectwo pracy"),
        SuggestionRule::keyword("lekarsk", "Orzeczenie lekarskie"),
        SuggestionRule::keyword("bhp", "Szkolenie BHP"),
        SuggestionRule::keyword("kwestionariusz", "Kwestionariusz osobowy"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitConfig {
    #[serde(default)]
    pub sink: SinkKind,
    /// Delay of the simulated archive call.
    #[serde(default = "default_commit_delay_ms")]
    pub delay_ms: u64,
    /// Target of the directory sink. Defaults to the platform data directory.
    #[serde(default)]
    pub output_directory: Option<String>,
}

fn default_commit_delay_ms() -> u64 {
    1500
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::default(),
            delay_ms: default_commit_delay_ms(),
            output_directory: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Simulated,
    Directory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// JSON file with the employee list. The built-in list is used when unset.
    #[serde(default)]
    pub employees_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
