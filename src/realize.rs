//! Shader module realization
//!
//! Turns cached bytecode into a live graphics-API shader module. The device is
//! reached through [`ModuleDevice`] so the request assembly can be exercised
//! without a Vulkan driver; `ash::Device` is the production implementation.

use crate::error::RealizeError;
use ash::vk;
use std::io::Cursor;

/// Caller-supplied part of a module creation request
#[derive(Debug, Clone, Default)]
pub struct ModuleCreateInfo {
    /// Cache key of the shader to realize
    pub name: String,
    pub flags: vk::ShaderModuleCreateFlags,
    /// Chained as `VkShaderModuleValidationCacheCreateInfoEXT` when present
    pub validation_cache: Option<vk::ValidationCacheEXT>,
}

impl ModuleCreateInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Fully assembled request handed to the device
#[derive(Debug, Clone, Copy)]
pub struct ModuleRequest<'a> {
    pub code: &'a [u32],
    pub flags: vk::ShaderModuleCreateFlags,
    pub validation_cache: Option<vk::ValidationCacheEXT>,
}

impl ModuleRequest<'_> {
    /// Size of the bytecode in bytes, as Vulkan expects it.
    pub fn code_size(&self) -> usize {
        std::mem::size_of_val(self.code)
    }
}

/// A device able to create shader modules
pub trait ModuleDevice {
    type Module;
    type Error: std::fmt::Display;

    /// True when the device handle is null and must not be used.
    fn is_null(&self) -> bool {
        false
    }

    fn create_module(&self, request: &ModuleRequest<'_>) -> Result<Self::Module, Self::Error>;
}

impl ModuleDevice for ash::Device {
    type Module = vk::ShaderModule;
    type Error = vk::Result;

    fn is_null(&self) -> bool {
        self.handle() == vk::Device::null()
    }

    fn create_module(&self, request: &ModuleRequest<'_>) -> Result<vk::ShaderModule, vk::Result> {
        let mut validation = request.validation_cache.map(|cache| {
            vk::ShaderModuleValidationCacheCreateInfoEXT::default().validation_cache(cache)
        });

        let mut create_info = vk::ShaderModuleCreateInfo::default()
            .flags(request.flags)
            .code(request.code);
        if let Some(validation) = validation.as_mut() {
            create_info = create_info.push_next(validation);
        }

        // SAFETY: `create_info` only borrows `request.code` and `validation`,
        // both of which outlive this call.
        unsafe { self.create_shader_module(&create_info, None) }
    }
}

/// Decode stored bytes into SPIR-V words, checking alignment and magic number.
pub fn decode_code(name: &str, bytes: &[u8]) -> Result<Vec<u32>, RealizeError> {
    ash::util::read_spv(&mut Cursor::new(bytes)).map_err(|e| RealizeError::InvalidCode {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Create a module on `device` from cached `code`.
pub fn realize<D: ModuleDevice>(
    device: &D,
    info: &ModuleCreateInfo,
    code: &[u32],
) -> Result<D::Module, RealizeError> {
    if device.is_null() {
        return Err(RealizeError::NullDevice);
    }

    let request = ModuleRequest {
        code,
        flags: info.flags,
        validation_cache: info.validation_cache,
    };
    device
        .create_module(&request)
        .map_err(|e| RealizeError::Creation {
            name: info.name.clone(),
            reason: e.to_string(),
        })
}
