//! Pipeline stages
//!
//! The closed set of shader stages a cached record can carry. The integer value
//! of each stage is persisted in the repository and must stay stable.

use serde::{Deserialize, Serialize};

/// Pipeline role of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
    RayGen,
    Intersect,
    AnyHit,
    ClosestHit,
    Miss,
    Callable,
    Task,
    Mesh,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 14] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
        ShaderStage::Compute,
        ShaderStage::RayGen,
        ShaderStage::Intersect,
        ShaderStage::AnyHit,
        ShaderStage::ClosestHit,
        ShaderStage::Miss,
        ShaderStage::Callable,
        ShaderStage::Task,
        ShaderStage::Mesh,
    ];

    /// Persisted integer value.
    pub const fn as_raw(self) -> i64 {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::TessControl => 1,
            ShaderStage::TessEvaluation => 2,
            ShaderStage::Geometry => 3,
            ShaderStage::Fragment => 4,
            ShaderStage::Compute => 5,
            ShaderStage::RayGen => 6,
            ShaderStage::Intersect => 7,
            ShaderStage::AnyHit => 8,
            ShaderStage::ClosestHit => 9,
            ShaderStage::Miss => 10,
            ShaderStage::Callable => 11,
            ShaderStage::Task => 12,
            ShaderStage::Mesh => 13,
        }
    }

    /// Inverse of [`as_raw`](Self::as_raw); `None` for values outside the set.
    pub fn from_raw(raw: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|stage| stage.as_raw() == raw)
    }

    /// Stage token understood by the GLSL frontend, if it can compile this stage.
    pub(crate) const fn naga_stage(self) -> Option<naga::ShaderStage> {
        match self {
            ShaderStage::Vertex => Some(naga::ShaderStage::Vertex),
            ShaderStage::Fragment => Some(naga::ShaderStage::Fragment),
            ShaderStage::Compute => Some(naga::ShaderStage::Compute),
            ShaderStage::TessControl
            | ShaderStage::TessEvaluation
            | ShaderStage::Geometry
            | ShaderStage::RayGen
            | ShaderStage::Intersect
            | ShaderStage::AnyHit
            | ShaderStage::ClosestHit
            | ShaderStage::Miss
            | ShaderStage::Callable
            | ShaderStage::Task
            | ShaderStage::Mesh => None,
        }
    }
}
