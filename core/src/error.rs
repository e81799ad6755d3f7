//! Error types for material building.

use matforge_package::AssemblerError;
use matforge_shared::{CodeGenJob, Platform, ShaderStage, TargetApi};

use crate::builder::BuilderState;

/// Invalid material or build configuration, detected before any generation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The platform/API combination selects no shader model
    #[error("no shader model supports platform '{platform}' with target API '{target_api}'")]
    NoShaderModels {
        platform: Platform,
        target_api: TargetApi,
    },

    /// The code generation override must name a single API
    #[error("code generation target API must be concrete, got 'all'")]
    InvalidCodeGenTarget,

    /// The parameter table is full
    #[error("cannot add parameter '{name}': material already has {max} parameters")]
    ParameterCapacity { name: String, max: usize },

    #[error("parameter '{0}' is declared more than once")]
    DuplicateParameter(String),

    #[error("parameter name must not be empty")]
    EmptyParameterName,

    #[error("parameter '{name}' has invalid array size {size} (must be at least 1)")]
    InvalidArraySize { name: String, size: u32 },

    /// Mask threshold outside 0..=1 with masked blending
    #[error("mask threshold {0} is out of range (must be 0.0-1.0)")]
    InvalidMaskThreshold(f32),
}

/// What went wrong with a single generation unit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitErrorKind {
    /// The shader generator failed
    #[error("generation failed: {0}")]
    Generation(String),

    /// The post-processor failed
    #[error("post-processing failed: {0}")]
    PostProcess(String),
}

/// Failure of one (job, variant, stage) unit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{job} variant {variant:#04x} {stage}: {kind}")]
pub struct UnitError {
    pub job: CodeGenJob,
    /// Variant key
    pub variant: u8,
    pub stage: ShaderStage,
    pub kind: UnitErrorKind,
}

/// Error returned by a build
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid material configuration: {0}")]
    Config(#[from] ConfigError),

    /// One or more generation units failed; no package was produced
    #[error("{} of the material's shaders failed to build{}", .0.len(), first_unit(.0))]
    Units(Vec<UnitError>),

    #[error("package assembly failed: {0}")]
    Assembler(#[from] AssemblerError),

    /// `build` was called on a builder that already finished
    #[error("builder already finished in state {0}")]
    AlreadyFinished(BuilderState),
}

fn first_unit(errors: &[UnitError]) -> String {
    errors
        .first()
        .map(|e| format!(" (first: {e})"))
        .unwrap_or_default()
}

impl BuildError {
    /// Unit failures carried by this error, if any
    pub fn unit_errors(&self) -> &[UnitError] {
        match self {
            BuildError::Units(errors) => errors,
            _ => &[],
        }
    }
}
