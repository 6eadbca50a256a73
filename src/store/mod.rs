//! Shader Repository
//!
//! Persistent, name-keyed cache of compiled shader bytecode with stage metadata.
//! The name is the key; storing under an existing name replaces the record.

pub mod persistence;

pub use persistence::SqliteShaderStore;

use crate::error::RepositoryError;
use crate::stage::ShaderStage;

/// Connection-sharing discipline for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Single owner; fastest locking path.
    #[default]
    Exclusive,
    /// Safe for concurrent writers at the cost of coarser locking.
    Shared,
}

impl From<bool> for AccessMode {
    fn from(shared: bool) -> Self {
        if shared {
            AccessMode::Shared
        } else {
            AccessMode::Exclusive
        }
    }
}

/// ShaderRecord: one cached shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderRecord {
    pub name: String,
    pub stage: ShaderStage,
    /// Little-endian SPIR-V words, exactly as stored.
    pub code: Vec<u8>,
}

/// Shader repository interface
pub trait ShaderStore: Send + Sync {
    /// Insert or replace the record stored under `name`.
    fn store(&self, name: &str, stage: ShaderStage, code: &[u8]) -> Result<(), RepositoryError>;

    /// Bytes stored under `name`; `NotFound` if absent.
    fn load(&self, name: &str) -> Result<Vec<u8>, RepositoryError>;

    /// Whole record stored under `name`, if any.
    fn fetch(&self, name: &str) -> Result<Option<ShaderRecord>, RepositoryError>;

    /// Stage of the record stored under `name`; absence is not an error.
    fn query(&self, name: &str) -> Result<Option<ShaderStage>, RepositoryError>;

    /// Delete the record under `name`. Returns whether a record was deleted.
    fn remove(&self, name: &str) -> Result<bool, RepositoryError>;

    /// Delete every record. Returns the number deleted.
    fn clear(&self) -> Result<usize, RepositoryError>;

    /// All cached names in ascending order.
    fn names(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Serialize SPIR-V words to the stored byte layout.
pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}
