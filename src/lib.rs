//! vk-shader-manager: GLSL to SPIR-V compilation with a persistent cache
//!
//! Clients create a context that pairs a compiler, fixed to one Vulkan/SPIR-V
//! target, with a SQLite-backed repository of compiled shaders. Shaders are
//! compiled once, cached by name, and later realized as Vulkan shader modules
//! straight from the cache.
//!
//! [`api::ShaderManager`] is the entry point; every operation returns a
//! [`api::ResultCode`] on failure.

pub mod api;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod realize;
pub mod registry;
pub mod stage;
pub mod store;
pub mod version;

pub use api::{ResultCode, ShaderManager};
pub use context::{CompileInfo, ContextCreateInfo, ShaderSource};
pub use error::VsmError;
pub use realize::{ModuleCreateInfo, ModuleDevice};
pub use registry::ContextHandle;
pub use stage::ShaderStage;
pub use version::{SpirvVersion, VulkanVersion};
