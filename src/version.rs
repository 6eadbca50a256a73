//! Target version resolution
//!
//! Translates the public Vulkan and SPIR-V version selectors into the tokens the
//! compiler consumes. Resolution runs once per context, before any repository or
//! compiler resource is opened, so an unsupported selector never leaves a
//! half-open resource behind.

use crate::error::VersionError;
use ash::vk;
use serde::{Deserialize, Serialize};

/// Vulkan API version a context compiles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulkanVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
    /// Enumeration bound; never a valid target.
    #[serde(rename = "max")]
    Max,
}

/// SPIR-V language version a context emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpirvVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
    #[serde(rename = "1.4")]
    V1_4,
    #[serde(rename = "1.5")]
    V1_5,
    #[serde(rename = "1.6")]
    V1_6,
    /// Enumeration bound; never a valid target.
    #[serde(rename = "max")]
    Max,
}

impl VulkanVersion {
    /// Converts a raw enumerator value (`0` = 1.0 … `4` = max).
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::V1_0),
            1 => Some(Self::V1_1),
            2 => Some(Self::V1_2),
            3 => Some(Self::V1_3),
            4 => Some(Self::Max),
            _ => None,
        }
    }

    /// Packed Vulkan API version, or `None` for the sentinel.
    pub const fn api_version(self) -> Option<u32> {
        match self {
            Self::V1_0 => Some(vk::API_VERSION_1_0),
            Self::V1_1 => Some(vk::API_VERSION_1_1),
            Self::V1_2 => Some(vk::API_VERSION_1_2),
            Self::V1_3 => Some(vk::API_VERSION_1_3),
            Self::Max => None,
        }
    }
}

impl SpirvVersion {
    /// Converts a raw enumerator value (`0` = 1.0 … `7` = max).
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::V1_0),
            1 => Some(Self::V1_1),
            2 => Some(Self::V1_2),
            3 => Some(Self::V1_3),
            4 => Some(Self::V1_4),
            5 => Some(Self::V1_5),
            6 => Some(Self::V1_6),
            7 => Some(Self::Max),
            _ => None,
        }
    }

    /// SPIR-V `(major, minor)` language version, or `None` for the sentinel.
    pub const fn language_version(self) -> Option<(u8, u8)> {
        match self {
            Self::V1_0 => Some((1, 0)),
            Self::V1_1 => Some((1, 1)),
            Self::V1_2 => Some((1, 2)),
            Self::V1_3 => Some((1, 3)),
            Self::V1_4 => Some((1, 4)),
            Self::V1_5 => Some((1, 5)),
            Self::V1_6 => Some((1, 6)),
            Self::Max => None,
        }
    }
}

/// Compiler tokens resolved from a validated version pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTargets {
    /// Packed Vulkan API version (`vk::make_api_version` layout)
    pub vulkan_api: u32,
    /// SPIR-V language version
    pub spirv: (u8, u8),
}

impl ResolvedTargets {
    /// True when the Vulkan target is at least `major.minor`.
    pub fn vulkan_at_least(&self, major: u32, minor: u32) -> bool {
        let api = self.vulkan_api;
        (vk::api_version_major(api), vk::api_version_minor(api)) >= (major, minor)
    }
}

/// Resolves a version pair into compiler tokens.
///
/// The Vulkan selector is checked first; the first unsupported selector wins.
pub fn resolve(vulkan: VulkanVersion, spirv: SpirvVersion) -> Result<ResolvedTargets, VersionError> {
    let vulkan_api = vulkan.api_version().ok_or(VersionError::Vulkan(vulkan))?;
    let spirv_lang = spirv.language_version().ok_or(VersionError::Spirv(spirv))?;
    Ok(ResolvedTargets {
        vulkan_api,
        spirv: spirv_lang,
    })
}
