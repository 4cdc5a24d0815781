//! Tracing setup shared by binaries embedding the workflow.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::config::schema::LoggingConfig;
use crate::error::ConfigError;

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level.
fn build_filter(config: &LoggingConfig, verbose: bool) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_new(format!("eteczka={level},eteczka_cli={level},warn")).map_err(|e| {
        ConfigError::Validation {
            message: format!("Invalid logging level '{}': {}", config.level, e),
        }
    })
}

/// Installs the global subscriber writing to stderr, in JSON when configured.
/// Records emitted through the `log` facade are forwarded as well.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<(), ConfigError> {
    let filter = build_filter(config, verbose)?;

    tracing_log::LogTracer::init().map_err(|e| ConfigError::Validation {
        message: format!("Failed to bridge log records: {}", e),
    })?;

    let result = if config.json {
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr));
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr));
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| ConfigError::Validation {
        message: format!("Failed to install tracing subscriber: {}", e),
    })
}
