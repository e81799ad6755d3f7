//! Material package record types
//!
//! The header carries the packaged subset of the canonical material description;
//! shader records point into the package's text and binary dictionaries.

use bitcode::{Decode, Encode};
use matforge_shared::{
    BlendingMode, CullingMode, Interpolation, Parameter, Shading, ShaderModel, ShaderStage,
    TargetApi, TransparencyMode, VertexDomain,
};
use serde::{Deserialize, Serialize};

/// Material header
///
/// Everything the runtime needs to configure pipeline state and bind parameters
/// for this material. Shading code itself only lives in the generated shaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MaterialHeader {
    /// Material name (e.g., "car_paint")
    pub name: String,

    pub shading: Shading,
    pub interpolation: Interpolation,
    pub vertex_domain: VertexDomain,
    pub blending: BlendingMode,

    /// Effective culling (already resolved against double-sidedness)
    pub culling: CullingMode,
    pub transparency: TransparencyMode,

    pub color_write: bool,
    pub depth_test: bool,

    /// Effective depth write (already resolved against the blending mode)
    pub depth_write: bool,
    pub double_sided: bool,
    pub shadow_multiplier: bool,

    /// Alpha threshold for `Masked` blending
    pub mask_threshold: f32,

    /// Required vertex attributes (`AttributeSet` bits)
    pub required_attributes: u8,

    /// Property-used bitset, one bit per `Property` index
    pub properties: u32,

    /// Custom variable names, one slot per `Variable`
    pub variables: Vec<Option<String>>,

    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,

    /// Variant exclusion mask the package was built with
    pub variant_filter: u8,
}

/// Lookup key for a shader inside a package.
///
/// The code generation target never takes part in lookups: a build applies one
/// override to every job, so shader model and runtime API identify a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderKey {
    pub shader_model: ShaderModel,
    pub target_api: TargetApi,
    pub variant: u8,
    pub stage: ShaderStage,
}

/// One packaged shader program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ShaderRecord {
    pub shader_model: ShaderModel,
    pub target_api: TargetApi,
    pub codegen_target_api: TargetApi,

    /// Variant key (`Variant` bits)
    pub variant: u8,
    pub stage: ShaderStage,

    /// Index into the text dictionary
    pub text: Option<u32>,

    /// Index into the binary dictionary
    pub binary: Option<u32>,
}

impl ShaderRecord {
    pub fn key(&self) -> ShaderKey {
        ShaderKey {
            shader_model: self.shader_model,
            target_api: self.target_api,
            variant: self.variant,
            stage: self.stage,
        }
    }
}
