//! Shader module realization from cached bytecode

use super::test_utils::{isolated_manager, repository_path, BASIC_FRAG};
use std::cell::RefCell;
use tempfile::TempDir;
use vk_shader_manager::realize::ModuleRequest;
use vk_shader_manager::store::{AccessMode, ShaderStore, SqliteShaderStore};
use vk_shader_manager::{
    CompileInfo, ContextCreateInfo, ModuleCreateInfo, ModuleDevice, ResultCode, ShaderStage,
};

/// Device that records the word count of every request it receives.
#[derive(Default)]
struct CapturingDevice {
    requests: RefCell<Vec<usize>>,
    fail: bool,
    null: bool,
}

impl ModuleDevice for CapturingDevice {
    type Module = usize;
    type Error = String;

    fn is_null(&self) -> bool {
        self.null
    }

    fn create_module(&self, request: &ModuleRequest<'_>) -> Result<usize, String> {
        if self.fail {
            return Err("ERROR_OUT_OF_DEVICE_MEMORY".to_string());
        }
        self.requests.borrow_mut().push(request.code.len());
        Ok(self.requests.borrow().len())
    }
}

#[test]
fn test_module_created_from_cached_code() {
    let manager = isolated_manager();
    let handle = manager.create_context(&ContextCreateInfo::default()).unwrap();
    manager
        .compile_shader(handle, &CompileInfo::from_source("basic.frag", BASIC_FRAG, ShaderStage::Fragment))
        .unwrap();
    let words = manager.load_shader(handle, "basic.frag").unwrap();

    let device = CapturingDevice::default();
    let module = manager
        .create_shader_module(handle, &device, &ModuleCreateInfo::new("basic.frag"))
        .unwrap();
    assert_eq!(module, 1);
    assert_eq!(*device.requests.borrow(), vec![words.len()]);
    manager.destroy_context(handle);
}

#[test]
fn test_module_failure_codes() {
    let manager = isolated_manager();
    let handle = manager.create_context(&ContextCreateInfo::default()).unwrap();
    manager
        .compile_shader(handle, &CompileInfo::from_source("basic.frag", BASIC_FRAG, ShaderStage::Fragment))
        .unwrap();
    let info = ModuleCreateInfo::new("basic.frag");

    let missing = ModuleCreateInfo::new("missing.frag");
    assert_eq!(
        manager.create_shader_module(handle, &CapturingDevice::default(), &missing),
        Err(ResultCode::RepositoryLoad)
    );

    let null = CapturingDevice {
        null: true,
        ..CapturingDevice::default()
    };
    assert_eq!(
        manager.create_shader_module(handle, &null, &info),
        Err(ResultCode::NullHandle)
    );

    let failing = CapturingDevice {
        fail: true,
        ..CapturingDevice::default()
    };
    assert_eq!(
        manager.create_shader_module(handle, &failing, &info),
        Err(ResultCode::ShaderModule)
    );
    manager.destroy_context(handle);
}

#[test]
fn test_corrupt_blob_reported_as_corrupt_cache() {
    let temp_dir = TempDir::new().unwrap();
    let path = repository_path(&temp_dir);
    {
        let store = SqliteShaderStore::open(&path, AccessMode::Exclusive).unwrap();
        store.store("broken.frag", ShaderStage::Fragment, b"not spir-v").unwrap();
    }

    let manager = isolated_manager();
    let handle = manager
        .create_context(&ContextCreateInfo {
            repository_path: path,
            ..ContextCreateInfo::default()
        })
        .unwrap();

    assert_eq!(
        manager.load_shader(handle, "broken.frag"),
        Err(ResultCode::CorruptCache)
    );
    let device = CapturingDevice::default();
    assert_eq!(
        manager.create_shader_module(handle, &device, &ModuleCreateInfo::new("broken.frag")),
        Err(ResultCode::CorruptCache)
    );
    assert!(device.requests.borrow().is_empty());
    manager.destroy_context(handle);
}
