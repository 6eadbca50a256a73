//! Error types for the shader manager.
//!
//! Each component reports failures through its own enum. `VsmError` aggregates
//! them for the API boundary, which maps every variant to exactly one public
//! [`ResultCode`](crate::api::ResultCode).

use crate::registry::ContextHandle;
use crate::stage::ShaderStage;
use crate::version::{SpirvVersion, VulkanVersion};
use std::path::PathBuf;
use thiserror::Error;

/// Target version selection errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Unsupported Vulkan version: {0:?}")]
    Vulkan(VulkanVersion),

    #[error("Unsupported SPIR-V version: {0:?}")]
    Spirv(SpirvVersion),
}

/// Shader compilation errors, one variant per compiler phase
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Shader stage not supported by the compiler: {0:?}")]
    StageNotSupported(ShaderStage),

    #[error("Preprocessing failed for shader '{name}': {log}")]
    Preprocess { name: String, log: String },

    #[error("Parsing failed for shader '{name}': {log}")]
    Parse { name: String, log: String },

    #[error("Linking failed for shader '{name}': {log}")]
    Link { name: String, log: String },
}

/// Repository (shader cache) errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to open repository at {path:?}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Failed to initialize repository schema: {0}")]
    SchemaInit(String),

    #[error("Failed to store shader '{name}': {reason}")]
    Store { name: String, reason: String },

    #[error("Shader not found: {0}")]
    NotFound(String),

    #[error("Failed to load shader '{name}': {reason}")]
    Load { name: String, reason: String },

    #[error("Failed to query shader '{name}': {reason}")]
    Query { name: String, reason: String },

    #[error("Failed to remove shader '{name}': {reason}")]
    Remove { name: String, reason: String },

    #[error("Failed to clear repository: {0}")]
    Clear(String),

    #[error("Corrupt cache entry '{name}': {reason}")]
    Corrupt { name: String, reason: String },
}

/// Context registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Null context handle")]
    NullHandle,

    #[error("Unknown context: {0}")]
    UnknownContext(ContextHandle),
}

/// Shader module realization errors
#[derive(Debug, Error)]
pub enum RealizeError {
    #[error("Null device handle")]
    NullDevice,

    #[error("Cached bytecode for '{name}' is not valid SPIR-V: {reason}")]
    InvalidCode { name: String, reason: String },

    #[error("Shader module creation failed for '{name}': {reason}")]
    Creation { name: String, reason: String },
}

/// Aggregate error carried through a context operation up to the API boundary
#[derive(Debug, Error)]
pub enum VsmError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Realize(#[from] RealizeError),

    #[error("Failed to read shader source {path:?}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration and logging setup errors
///
/// These never cross the API boundary; they surface while the host application
/// assembles its configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
