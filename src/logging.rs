//! Logging System
//!
//! Structured logging on top of `tracing`. The library only emits events;
//! embedders that want them rendered call [`init_logging`] once at startup.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Environment variable whose filter directives replace the configured level
pub const LOG_ENV: &str = "VSM_LOG";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, used when `output` is `file`
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Colored output (text format on a terminal stream only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `vk_shader_manager::store = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("vk-shader-manager.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: default_log_file(),
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Initialize the global subscriber
///
/// Priority order (highest to lowest):
/// 1. `VSM_LOG` environment variable
/// 2. Configuration (`level` plus `modules`)
/// 3. Defaults
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ConfigurationError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = build_env_filter(config)?;
    let writer = make_writer(config)?;
    let ansi = config.color && config.output != LogOutput::File;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    };

    Registry::default()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| ConfigurationError::Logging(e.to_string()))
}

/// Build the event filter from `VSM_LOG` or the configuration
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigurationError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    filter_from_config(config)
}

fn filter_from_config(config: &LoggingConfig) -> Result<EnvFilter, ConfigurationError> {
    let mut filter = EnvFilter::try_new(&config.level).map_err(|e| {
        ConfigurationError::Logging(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        filter = filter.add_directive(directive.parse().map_err(|e| {
            ConfigurationError::Logging(format!("Invalid log directive '{}': {}", directive, e))
        })?);
    }

    Ok(filter)
}

fn make_writer(config: &LoggingConfig) -> Result<BoxMakeWriter, ConfigurationError> {
    match config.output {
        LogOutput::Stdout => Ok(BoxMakeWriter::new(std::io::stdout)),
        LogOutput::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
        LogOutput::File => {
            if let Some(parent) = config.file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigurationError::Logging(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.file)
                .map_err(|e| {
                    ConfigurationError::Logging(format!(
                        "Failed to open log file {}: {}",
                        config.file.display(),
                        e
                    ))
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
    }
}
