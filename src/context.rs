//! Context
//!
//! A context binds one compiler configuration (fixed target versions) to one
//! open shader repository. Both are created together from a
//! [`ContextCreateInfo`] and released together when the context drops.

use crate::compiler::Compiler;
use crate::error::VsmError;
use crate::stage::ShaderStage;
use crate::store::{words_to_bytes, AccessMode, ShaderStore, SqliteShaderStore};
use crate::version::{self, SpirvVersion, VulkanVersion};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration record a context is created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextCreateInfo {
    /// Repository file; empty for a private in-memory repository
    pub repository_path: PathBuf,
    /// Allow concurrent writers on the repository
    pub shared: bool,
    pub vulkan_version: VulkanVersion,
    pub spirv_version: SpirvVersion,
}

impl Default for ContextCreateInfo {
    fn default() -> Self {
        Self {
            repository_path: PathBuf::new(),
            shared: false,
            vulkan_version: VulkanVersion::V1_2,
            spirv_version: SpirvVersion::V1_5,
        }
    }
}

/// Where a shader's GLSL text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    Text(String),
    File(PathBuf),
}

/// Compile request record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileInfo {
    pub name: String,
    pub source: ShaderSource,
    pub stage: ShaderStage,
}

impl CompileInfo {
    pub fn from_source(
        name: impl Into<String>,
        source: impl Into<String>,
        stage: ShaderStage,
    ) -> Self {
        Self {
            name: name.into(),
            source: ShaderSource::Text(source.into()),
            stage,
        }
    }

    pub fn from_file(name: impl Into<String>, path: impl Into<PathBuf>, stage: ShaderStage) -> Self {
        Self {
            name: name.into(),
            source: ShaderSource::File(path.into()),
            stage,
        }
    }

    fn read_source(&self) -> Result<String, VsmError> {
        match &self.source {
            ShaderSource::Text(text) => Ok(text.clone()),
            ShaderSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| VsmError::SourceUnreadable {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

/// Compiler + repository pair owned by one client handle
pub struct Context {
    compiler: Compiler,
    store: Box<dyn ShaderStore>,
}

impl Context {
    /// Create a context from `info`.
    ///
    /// Target versions are validated before the repository is opened.
    pub fn create(info: &ContextCreateInfo) -> Result<Self, VsmError> {
        let targets = version::resolve(info.vulkan_version, info.spirv_version)?;
        let store = SqliteShaderStore::open(&info.repository_path, AccessMode::from(info.shared))?;

        info!(
            repository = %display_path(&info.repository_path),
            shared = info.shared,
            vulkan = ?info.vulkan_version,
            spirv = ?info.spirv_version,
            "Created shader context"
        );

        Ok(Self::with_store(Compiler::new(targets), Box::new(store)))
    }

    /// Assemble a context from an existing compiler and repository
    pub fn with_store(compiler: Compiler, store: Box<dyn ShaderStore>) -> Self {
        Self { compiler, store }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn store(&self) -> &dyn ShaderStore {
        self.store.as_ref()
    }

    /// Compile the request and store the result under its name.
    pub fn compile_and_store(&self, request: &CompileInfo) -> Result<Vec<u32>, VsmError> {
        let source = request.read_source()?;
        let code = self
            .compiler
            .compile(&request.name, request.stage, &source)?;
        self.store
            .store(&request.name, request.stage, &words_to_bytes(&code))?;

        info!(
            shader = %request.name,
            stage = ?request.stage,
            words = code.len(),
            "Compiled and cached shader"
        );
        Ok(code)
    }

    /// Return cached bytes when a record with the requested stage exists,
    /// otherwise compile and store.
    pub fn load_or_compile(&self, request: &CompileInfo) -> Result<Vec<u8>, VsmError> {
        if let Some(record) = self.store.fetch(&request.name)? {
            if record.stage == request.stage {
                debug!(shader = %request.name, "Shader cache hit");
                return Ok(record.code);
            }
            debug!(
                shader = %request.name,
                cached = ?record.stage,
                requested = ?request.stage,
                "Cached stage differs; recompiling"
            );
        }

        let code = self.compile_and_store(request)?;
        Ok(words_to_bytes(&code))
    }
}

fn display_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ":memory:".to_string()
    } else {
        path.display().to_string()
    }
}
