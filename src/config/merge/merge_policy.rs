//! Defaults every layered load starts from.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a builder with the default repository and target settings applied.
///
/// Sources added afterwards override these keys in the order they are added.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("repository.path", "")?
        .set_default("repository.shared", false)?
        .set_default("target.vulkan_version", "1.2")?
        .set_default("target.spirv_version", "1.5")
}
