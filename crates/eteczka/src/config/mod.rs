pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, load_config_from_yaml_str};
pub use schema::{
    CommitConfig, Config, DirectoryConfig, ExtractorKind, IntakeConfig, LoggingConfig,
    PartitionConfig, SimulationConfig, SinkKind, SuggestionRule, SuggestionsConfig,
};
