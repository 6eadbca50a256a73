//! Repository behaviour against real database files

use super::test_utils::repository_path;
use tempfile::TempDir;
use vk_shader_manager::error::RepositoryError;
use vk_shader_manager::store::{AccessMode, ShaderStore, SqliteShaderStore};
use vk_shader_manager::ShaderStage;

#[test]
fn test_missing_file_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let path = repository_path(&temp_dir);
    assert!(!path.exists());

    let store = SqliteShaderStore::open(&path, AccessMode::Exclusive).unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn test_records_persist_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = repository_path(&temp_dir);

    {
        let store = SqliteShaderStore::open(&path, AccessMode::Exclusive).unwrap();
        store.store("a.vert", ShaderStage::Vertex, &[1, 2, 3, 4]).unwrap();
        store.store("b.comp", ShaderStage::Compute, &[5, 6, 7, 8]).unwrap();
    }

    let store = SqliteShaderStore::open(&path, AccessMode::Exclusive).unwrap();
    assert_eq!(store.names().unwrap(), vec!["a.vert".to_string(), "b.comp".to_string()]);
    assert_eq!(store.load("b.comp").unwrap(), vec![5, 6, 7, 8]);
    assert_eq!(store.query("a.vert").unwrap(), Some(ShaderStage::Vertex));
}

#[test]
fn test_shared_mode_sees_other_writers() {
    let temp_dir = TempDir::new().unwrap();
    let path = repository_path(&temp_dir);

    let writer = SqliteShaderStore::open(&path, AccessMode::Shared).unwrap();
    let reader = SqliteShaderStore::open(&path, AccessMode::Shared).unwrap();

    writer.store("shared.frag", ShaderStage::Fragment, &[9, 9, 9, 9]).unwrap();
    assert_eq!(reader.load("shared.frag").unwrap(), vec![9, 9, 9, 9]);

    assert!(reader.remove("shared.frag").unwrap());
    assert_eq!(writer.query("shared.frag").unwrap(), None);
}

#[test]
fn test_absent_names() {
    let store = SqliteShaderStore::in_memory().unwrap();
    assert_eq!(store.query("").unwrap(), None);
    assert_eq!(store.query("never-stored").unwrap(), None);
    assert!(matches!(
        store.load("never-stored"),
        Err(RepositoryError::NotFound(_))
    ));
    assert!(!store.remove("never-stored").unwrap());
}

#[test]
fn test_clear_empties_repository() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteShaderStore::open(repository_path(&temp_dir), AccessMode::Exclusive).unwrap();
    for (i, stage) in ShaderStage::ALL.iter().enumerate() {
        store.store(&format!("shader{}", i), *stage, &[i as u8; 4]).unwrap();
    }
    assert_eq!(store.clear().unwrap(), ShaderStage::ALL.len());
    assert!(store.names().unwrap().is_empty());
    assert_eq!(store.clear().unwrap(), 0);
}
