//! Shader source generation.
//!
//! The orchestrator treats generation as an opaque capability: it calls
//! [`ShaderGenerator::generate`] once per (job, variant, stage) unit, possibly from
//! several worker threads at once. [`GlslGenerator`] is the built-in implementation.

mod glsl;

pub use glsl::GlslGenerator;

use matforge_shared::{CodeGenJob, ShaderStage, Variant};

use crate::descriptor::MaterialDescriptor;

/// Error returned by a shader generator.
///
/// Distinct from an empty output, which is a valid (if unusual) result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct GenerationError(pub String);

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Turns a material description into shading-language source for one unit.
///
/// Implementations must be deterministic: the same inputs always produce the same text.
pub trait ShaderGenerator: Send + Sync {
    fn generate(
        &self,
        descriptor: &MaterialDescriptor,
        job: &CodeGenJob,
        variant: Variant,
        stage: ShaderStage,
    ) -> Result<String, GenerationError>;
}
