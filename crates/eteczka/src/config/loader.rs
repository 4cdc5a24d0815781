use std::path::Path;

use crate::config::schema::{CommitConfig, Config, SinkKind};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

/// Loads a config file. `.yaml`/`.yml` files are parsed as YAML, anything
/// else as JSON.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        load_config_from_yaml_str(&content)
    } else {
        load_config_from_str(&content)
    }
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_yaml::from_str(content)?;
    load_config_from_value(json_value)
}

fn load_config_from_value(json_value: serde_json::Value) -> Result<Config, ConfigError> {
    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let sim = &config.intake.simulation;
    if sim.min_delay_ms > sim.max_delay_ms {
        return Err(ConfigError::Validation {
            message: format!(
                "intake.simulation: min_delay_ms ({}) exceeds max_delay_ms ({})",
                sim.min_delay_ms, sim.max_delay_ms
            ),
        });
    }
    if sim.min_pages == 0 || sim.min_pages > sim.max_pages {
        return Err(ConfigError::Validation {
            message: format!(
                "intake.simulation: page bounds must satisfy 1 <= min_pages ({}) <= max_pages ({})",
                sim.min_pages, sim.max_pages
            ),
        });
    }

    if config.intake.accepted_media_types.is_empty() {
        return Err(ConfigError::Validation {
            message: "intake.accepted_media_types must not be empty".to_string(),
        });
    }

    for (index, rule) in config.suggestions.rules.iter().enumerate() {
        match (&rule.keyword, &rule.pattern) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(ConfigError::InvalidSuggestion {
                    index,
                    reason: "exactly one of 'keyword' or 'pattern' must be set".to_string(),
                });
            }
            (Some(keyword), None) if keyword.trim().is_empty() => {
                return Err(ConfigError::InvalidSuggestion {
                    index,
                    reason: "keyword must not be empty".to_string(),
                });
            }
            (None, Some(pattern)) => {
                if let Err(e) = regex::Regex::new(pattern) {
                    return Err(ConfigError::InvalidSuggestion {
                        index,
                        reason: format!("Invalid regex pattern: {}", e),
                    });
                }
            }
            _ => {}
        }
    }

    validate_commit(&config.commit)?;

    Ok(())
}

fn validate_commit(commit: &CommitConfig) -> Result<(), ConfigError> {
    if commit.sink == SinkKind::Directory {
        if let Some(dir) = &commit.output_directory {
            if dir.trim().is_empty() {
                return Err(ConfigError::Validation {
                    message: "commit.output_directory must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}
