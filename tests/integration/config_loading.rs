//! Building contexts from loaded configuration

use super::test_utils::{isolated_manager, BASIC_FRAG};
use tempfile::TempDir;
use vk_shader_manager::config::ConfigLoader;
use vk_shader_manager::{CompileInfo, ShaderStage, SpirvVersion};

#[test]
fn test_context_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let repository = temp_dir.path().join("shaders.db");
    let config_file = temp_dir.path().join("vsm.toml");
    std::fs::write(
        &config_file,
        format!(
            "[repository]\npath = {:?}\n\n[target]\nvulkan_version = \"1.3\"\nspirv_version = \"1.6\"\n",
            repository.display().to_string()
        ),
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.target.spirv_version, SpirvVersion::V1_6);

    let manager = isolated_manager();
    let handle = manager.create_context(&config.context_info()).unwrap();
    manager
        .compile_shader(handle, &CompileInfo::from_source("basic.frag", BASIC_FRAG, ShaderStage::Fragment))
        .unwrap();
    let words = manager.load_shader(handle, "basic.frag").unwrap();
    assert_eq!(words[1], 0x0001_0600);
    manager.destroy_context(handle);

    assert!(repository.exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(ConfigLoader::load_from_str("[target]\nvulkan_version = \"max\"\n").is_err());
    assert!(ConfigLoader::load_from_str("[repository]\nshared = \"sometimes\"\n").is_err());
}
