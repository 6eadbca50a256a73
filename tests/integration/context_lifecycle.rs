//! Context creation, lookup and destruction through the public API

use super::test_utils::{isolated_manager, repository_path};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use vk_shader_manager::{ContextCreateInfo, ContextHandle, ResultCode, SpirvVersion, VulkanVersion};

#[test]
fn test_create_and_destroy() {
    let manager = isolated_manager();
    let handle = manager.create_context(&ContextCreateInfo::default()).unwrap();
    assert!(!handle.is_null());
    assert_eq!(manager.registry().len(), 1);

    manager.destroy_context(handle);
    assert!(manager.registry().is_empty());
    assert_eq!(manager.find_shader(handle, "x"), Err(ResultCode::InvalidContext));
}

#[test]
fn test_destroy_twice_and_null_are_harmless() {
    let manager = isolated_manager();
    let handle = manager.create_context(&ContextCreateInfo::default()).unwrap();
    manager.destroy_context(handle);
    manager.destroy_context(handle);
    manager.destroy_context(ContextHandle::NULL);
    assert_eq!(manager.list_shaders(handle), Err(ResultCode::InvalidContext));
    assert_eq!(
        manager.list_shaders(ContextHandle::NULL),
        Err(ResultCode::NullHandle)
    );
}

#[test]
fn test_version_gate_creates_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = repository_path(&temp_dir);
    let manager = isolated_manager();

    let vulkan = ContextCreateInfo {
        repository_path: path.clone(),
        vulkan_version: VulkanVersion::Max,
        ..ContextCreateInfo::default()
    };
    assert_eq!(manager.create_context(&vulkan), Err(ResultCode::VulkanVersion));

    let spirv = ContextCreateInfo {
        repository_path: path.clone(),
        spirv_version: SpirvVersion::Max,
        ..ContextCreateInfo::default()
    };
    assert_eq!(manager.create_context(&spirv), Err(ResultCode::SpirvVersion));

    assert!(!path.exists());
    assert!(manager.registry().is_empty());
}

#[test]
fn test_repository_open_failure_code() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();

    let manager = isolated_manager();
    let info = ContextCreateInfo {
        repository_path: blocker.join("shaders.db"),
        ..ContextCreateInfo::default()
    };
    assert_eq!(manager.create_context(&info), Err(ResultCode::RepositoryOpen));
}

#[test]
fn test_contexts_are_independent() {
    let manager = isolated_manager();
    let first = manager.create_context(&ContextCreateInfo::default()).unwrap();
    let second = manager.create_context(&ContextCreateInfo::default()).unwrap();
    assert_ne!(first, second);

    manager.destroy_context(first);
    assert_eq!(manager.list_shaders(second), Ok(Vec::new()));
    manager.destroy_context(second);
}

#[test]
fn test_concurrent_create_and_destroy() {
    let manager = Arc::new(isolated_manager());
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..10 {
                    let handle = manager.create_context(&ContextCreateInfo::default()).unwrap();
                    assert_eq!(manager.list_shaders(handle), Ok(Vec::new()));
                    manager.destroy_context(handle);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert!(manager.registry().is_empty());
}
