//! User config file source: `<config_dir>/vk-shader-manager/config.toml`

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to the user config file, when a home directory can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "vk-shader-manager")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the user config file to `builder` if it exists.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) if path.is_file() => {
            debug!(config_path = %path.display(), "Using user configuration file");
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "No user configuration file");
            builder
        }
        None => builder,
    }
}
