//! Caller-named config file source. Unlike the user file it must exist.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use config::FileFormat;
use std::path::Path;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        File::from(path.to_path_buf())
            .format(FileFormat::Toml)
            .required(true),
    )
}
