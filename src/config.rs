//! Configuration System
//!
//! Layered configuration for hosts that build contexts from settings rather
//! than code. Sources, lowest precedence first: built-in defaults, the user
//! config file, an explicit file, then `VSM__`-prefixed environment variables.

use crate::context::ContextCreateInfo;
use crate::error::ConfigurationError;
use crate::logging::LoggingConfig;
use crate::version::{SpirvVersion, VulkanVersion};
use config::{File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;
mod sources;

pub use sources::environment::{ENV_PREFIX, ENV_SEPARATOR};
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shader repository settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository file; empty selects a private in-memory repository
    #[serde(default)]
    pub path: PathBuf,

    /// Allow concurrent writers
    #[serde(default)]
    pub shared: bool,
}

/// Compilation targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_vulkan_version")]
    pub vulkan_version: VulkanVersion,

    #[serde(default = "default_spirv_version")]
    pub spirv_version: SpirvVersion,
}

fn default_vulkan_version() -> VulkanVersion {
    VulkanVersion::V1_2
}

fn default_spirv_version() -> SpirvVersion {
    SpirvVersion::V1_5
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            vulkan_version: default_vulkan_version(),
            spirv_version: default_spirv_version(),
        }
    }
}

impl ManagerConfig {
    /// Reject selectors no context could be created with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        crate::version::resolve(self.target.vulkan_version, self.target.spirv_version)
            .map(|_| ())
            .map_err(|e| ConfigurationError::Invalid(format!("target: {}", e)))
    }

    /// Context creation record described by this configuration
    pub fn context_info(&self) -> ContextCreateInfo {
        ContextCreateInfo {
            repository_path: self.repository.path.clone(),
            shared: self.repository.shared,
            vulkan_version: self.target.vulkan_version,
            spirv_version: self.target.spirv_version,
        }
    }
}

/// Loads [`ManagerConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from defaults, the user file, `explicit` (must exist when given),
    /// and the environment, then validate.
    pub fn load(explicit: Option<&Path>) -> Result<ManagerConfig, ConfigurationError> {
        let mut builder = merge::merge_policy::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder);
        if let Some(path) = explicit {
            debug!(config_path = %path.display(), "Using explicit configuration file");
            builder = sources::explicit_file::add_to_builder(builder, path);
        }
        builder = sources::environment::add_to_builder(builder);

        let config: ManagerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a single TOML file, without the user file or environment.
    pub fn load_from_file(path: &Path) -> Result<ManagerConfig, ConfigurationError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let config: ManagerConfig = sources::explicit_file::add_to_builder(builder, path)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML text.
    pub fn load_from_str(toml: &str) -> Result<ManagerConfig, ConfigurationError> {
        let config: ManagerConfig = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
