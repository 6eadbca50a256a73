//! Compiler Adapter
//!
//! Drives GLSL → SPIR-V compilation for a single shader stage through `naga`:
//! preprocess and parse (one frontend pass), link (module validation), then
//! generate. Each phase fails with its own [`CompileError`] variant so callers
//! can tell malformed source from interface problems.

use crate::error::CompileError;
use crate::stage::ShaderStage;
use crate::version::ResolvedTargets;
use naga::back::spv;
use naga::front::glsl;
use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};
use tracing::debug;

/// Entry point name the GLSL frontend gives every stage.
const ENTRY_POINT: &str = "main";

/// Configuration-only compiler bound to one context's target versions.
///
/// Holds no per-call state; every frontend, validator and writer object lives
/// only for the duration of a single [`compile`](Compiler::compile) call.
#[derive(Debug, Clone)]
pub struct Compiler {
    targets: ResolvedTargets,
    capabilities: Capabilities,
}

impl Compiler {
    pub fn new(targets: ResolvedTargets) -> Self {
        Self {
            targets,
            capabilities: capabilities_for(&targets),
        }
    }

    pub fn targets(&self) -> &ResolvedTargets {
        &self.targets
    }

    /// Compile GLSL `source` for `stage` into SPIR-V words.
    pub fn compile(
        &self,
        name: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Vec<u32>, CompileError> {
        let naga_stage = stage
            .naga_stage()
            .ok_or(CompileError::StageNotSupported(stage))?;

        let module = self.parse(name, naga_stage, source)?;
        let info = self.link(name, &module)?;
        let code = self.generate(name, naga_stage, &module, &info)?;

        debug!(shader = name, ?stage, words = code.len(), "Compiled shader");
        Ok(code)
    }

    /// Preprocess and parse. Preprocessor diagnostics take precedence when the
    /// frontend reports a mix.
    fn parse(
        &self,
        name: &str,
        stage: naga::ShaderStage,
        source: &str,
    ) -> Result<naga::Module, CompileError> {
        let mut frontend = glsl::Frontend::default();
        let options = glsl::Options::from(stage);

        frontend.parse(&options, source).map_err(|failure| {
            let log = failure
                .errors
                .iter()
                .map(|error| error.kind.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            let preprocessor = failure
                .errors
                .iter()
                .any(|error| matches!(error.kind, glsl::ErrorKind::PreprocessorError(_)));

            if preprocessor {
                CompileError::Preprocess {
                    name: name.to_string(),
                    log,
                }
            } else {
                CompileError::Parse {
                    name: name.to_string(),
                    log,
                }
            }
        })
    }

    fn link(&self, name: &str, module: &naga::Module) -> Result<ModuleInfo, CompileError> {
        let mut validator = Validator::new(ValidationFlags::all(), self.capabilities);
        validator.validate(module).map_err(|error| CompileError::Link {
            name: name.to_string(),
            log: error.to_string(),
        })
    }

    fn generate(
        &self,
        name: &str,
        stage: naga::ShaderStage,
        module: &naga::Module,
        info: &ModuleInfo,
    ) -> Result<Vec<u32>, CompileError> {
        // Emit the module as written, with identical bytes in debug and release.
        let options = spv::Options {
            lang_version: self.targets.spirv,
            flags: spv::WriterFlags::empty(),
            ..spv::Options::default()
        };
        let pipeline = spv::PipelineOptions {
            shader_stage: stage,
            entry_point: ENTRY_POINT.to_string(),
        };

        spv::write_vec(module, info, &options, Some(&pipeline)).map_err(|error| {
            CompileError::Link {
                name: name.to_string(),
                log: format!("SPIR-V generation: {error}"),
            }
        })
    }
}

/// Validator capabilities available on the Vulkan target.
fn capabilities_for(targets: &ResolvedTargets) -> Capabilities {
    let mut capabilities = Capabilities::all();
    if !targets.vulkan_at_least(1, 1) {
        capabilities.remove(
            Capabilities::SUBGROUP | Capabilities::SUBGROUP_BARRIER | Capabilities::MULTIVIEW,
        );
    }
    if !targets.vulkan_at_least(1, 2) {
        capabilities.remove(
            Capabilities::SAMPLER_NON_UNIFORM_INDEXING
                | Capabilities::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING
                | Capabilities::UNIFORM_BUFFER_AND_STORAGE_TEXTURE_ARRAY_NON_UNIFORM_INDEXING,
        );
    }
    capabilities
}
