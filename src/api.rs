//! Shader Manager API
//!
//! The public surface. Every operation resolves its context through the
//! registry, composes the compiler and repository, and translates any failure
//! into a [`ResultCode`] exactly once, here.

use crate::context::{CompileInfo, ContextCreateInfo};
use crate::error::{
    CompileError, RealizeError, RegistryError, RepositoryError, VersionError, VsmError,
};
use crate::realize::{self, ModuleCreateInfo, ModuleDevice};
use crate::registry::{ContextHandle, ContextRegistry};
use crate::stage::ShaderStage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Public result codes
///
/// Values are stable and part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    Success = 0,
    NullHandle = 1,
    InvalidContext = 2,
    CorruptCache = 3,
    VulkanVersion = 4,
    SpirvVersion = 5,
    ShaderStage = 6,
    CompilePreprocess = 7,
    CompileParse = 8,
    CompileLink = 9,
    RepositoryOpen = 10,
    RepositoryInit = 11,
    RepositoryStore = 12,
    RepositoryLoad = 13,
    RepositoryQuery = 14,
    RepositoryRemove = 15,
    RepositoryClear = 16,
    ShaderModule = 17,
    SourceUnreadable = 18,
}

impl ResultCode {
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Code for a finished operation: `Success` or the failure's code.
    pub fn of<T>(result: &Result<T, ResultCode>) -> ResultCode {
        match result {
            Ok(_) => ResultCode::Success,
            Err(code) => *code,
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, self.as_raw())
    }
}

impl From<&VsmError> for ResultCode {
    fn from(error: &VsmError) -> Self {
        match error {
            VsmError::Version(VersionError::Vulkan(_)) => ResultCode::VulkanVersion,
            VsmError::Version(VersionError::Spirv(_)) => ResultCode::SpirvVersion,

            VsmError::Compile(CompileError::StageNotSupported(_)) => ResultCode::ShaderStage,
            VsmError::Compile(CompileError::Preprocess { .. }) => ResultCode::CompilePreprocess,
            VsmError::Compile(CompileError::Parse { .. }) => ResultCode::CompileParse,
            VsmError::Compile(CompileError::Link { .. }) => ResultCode::CompileLink,

            VsmError::Repository(RepositoryError::Open { .. }) => ResultCode::RepositoryOpen,
            VsmError::Repository(RepositoryError::SchemaInit(_)) => ResultCode::RepositoryInit,
            VsmError::Repository(RepositoryError::Store { .. }) => ResultCode::RepositoryStore,
            VsmError::Repository(RepositoryError::NotFound(_)) => ResultCode::RepositoryLoad,
            VsmError::Repository(RepositoryError::Load { .. }) => ResultCode::RepositoryLoad,
            VsmError::Repository(RepositoryError::Query { .. }) => ResultCode::RepositoryQuery,
            VsmError::Repository(RepositoryError::Remove { .. }) => ResultCode::RepositoryRemove,
            VsmError::Repository(RepositoryError::Clear(_)) => ResultCode::RepositoryClear,
            VsmError::Repository(RepositoryError::Corrupt { .. }) => ResultCode::CorruptCache,

            VsmError::Registry(RegistryError::NullHandle) => ResultCode::NullHandle,
            VsmError::Registry(RegistryError::UnknownContext(_)) => ResultCode::InvalidContext,

            VsmError::Realize(RealizeError::NullDevice) => ResultCode::NullHandle,
            VsmError::Realize(RealizeError::InvalidCode { .. }) => ResultCode::CorruptCache,
            VsmError::Realize(RealizeError::Creation { .. }) => ResultCode::ShaderModule,

            VsmError::SourceUnreadable { .. } => ResultCode::SourceUnreadable,
        }
    }
}

/// Shader Manager service
///
/// Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct ShaderManager {
    registry: Arc<ContextRegistry>,
}

impl Default for ShaderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderManager {
    /// Manager over the process-wide registry
    pub fn new() -> Self {
        Self::with_registry(ContextRegistry::global())
    }

    /// Manager over an explicitly owned registry
    pub fn with_registry(registry: Arc<ContextRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ContextRegistry> {
        &self.registry
    }

    /// Create a context
    ///
    /// Versions are validated before the repository is opened; on failure no
    /// repository file is created and nothing is registered.
    pub fn create_context(&self, info: &ContextCreateInfo) -> Result<ContextHandle, ResultCode> {
        translate("create_context", self.registry.create(info))
    }

    /// Destroy a context. Unknown, stale and null handles are ignored.
    pub fn destroy_context(&self, handle: ContextHandle) {
        self.registry.destroy(handle);
    }

    /// Compile a shader and store the bytecode under its name
    ///
    /// # Arguments
    /// * `handle` - Context to compile in
    /// * `info` - Name, source and stage
    ///
    /// # Behavior
    /// * Replaces any record already stored under the name
    /// * Stores nothing when compilation fails
    pub fn compile_shader(&self, handle: ContextHandle, info: &CompileInfo) -> Result<(), ResultCode> {
        let result = self
            .context(handle)
            .and_then(|context| context.compile_and_store(info))
            .map(|_| ());
        translate("compile_shader", result)
    }

    /// Return the cached SPIR-V for a shader, compiling it first on a miss
    ///
    /// A cached record whose stage differs from the request counts as a miss.
    pub fn load_or_compile(
        &self,
        handle: ContextHandle,
        info: &CompileInfo,
    ) -> Result<Vec<u32>, ResultCode> {
        let result = self.context(handle).and_then(|context| {
            let bytes = context.load_or_compile(info)?;
            Ok(realize::decode_code(&info.name, &bytes)?)
        });
        translate("load_or_compile", result)
    }

    /// Probe the cache for `name`
    ///
    /// # Returns
    /// * `Some(stage)` when cached, `None` otherwise; absence is never an error
    pub fn find_shader(
        &self,
        handle: ContextHandle,
        name: &str,
    ) -> Result<Option<ShaderStage>, ResultCode> {
        let result = self
            .context(handle)
            .and_then(|context| Ok(context.store().query(name)?));
        translate("find_shader", result)
    }

    /// Load the cached SPIR-V words stored under `name`
    pub fn load_shader(&self, handle: ContextHandle, name: &str) -> Result<Vec<u32>, ResultCode> {
        let result = self.context(handle).and_then(|context| {
            let bytes = context.store().load(name)?;
            Ok(realize::decode_code(name, &bytes)?)
        });
        translate("load_shader", result)
    }

    /// Remove `name` from the cache. Removing an absent name succeeds.
    pub fn remove_shader(&self, handle: ContextHandle, name: &str) -> Result<(), ResultCode> {
        let result = self
            .context(handle)
            .and_then(|context| Ok(context.store().remove(name)?))
            .map(|_| ());
        translate("remove_shader", result)
    }

    /// Remove every cached shader
    pub fn clear_shader_cache(&self, handle: ContextHandle) -> Result<(), ResultCode> {
        let result = self
            .context(handle)
            .and_then(|context| Ok(context.store().clear()?))
            .map(|_| ());
        translate("clear_shader_cache", result)
    }

    /// Names of every cached shader, ascending
    pub fn list_shaders(&self, handle: ContextHandle) -> Result<Vec<String>, ResultCode> {
        let result = self
            .context(handle)
            .and_then(|context| Ok(context.store().names()?));
        translate("list_shaders", result)
    }

    /// Create a shader module on `device` from the bytecode cached under
    /// `info.name`
    ///
    /// # Returns
    /// * The device's module handle
    /// * `RepositoryLoad` when the name is not cached, `CorruptCache` when the
    ///   cached bytes are not SPIR-V, `ShaderModule` when the device fails
    pub fn create_shader_module<D: ModuleDevice>(
        &self,
        handle: ContextHandle,
        device: &D,
        info: &ModuleCreateInfo,
    ) -> Result<D::Module, ResultCode> {
        let result = self.context(handle).and_then(|context| {
            if device.is_null() {
                return Err(RealizeError::NullDevice.into());
            }
            let bytes = context.store().load(&info.name)?;
            let code = realize::decode_code(&info.name, &bytes)?;
            Ok(realize::realize(device, info, &code)?)
        });
        translate("create_shader_module", result)
    }

    fn context(&self, handle: ContextHandle) -> Result<Arc<crate::context::Context>, VsmError> {
        Ok(self.registry.get(handle)?)
    }
}

/// Map an internal outcome onto the public code space.
fn translate<T>(operation: &'static str, result: Result<T, VsmError>) -> Result<T, ResultCode> {
    result.map_err(|error| {
        let code = ResultCode::from(&error);
        warn!(operation, %code, error = %error, "Operation failed");
        code
    })
    .inspect(|_| debug!(operation, "Operation succeeded"))
}
