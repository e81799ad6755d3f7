//! Shader model capability table.
//!
//! Describes, for each shader model, which deployment class it belongs to and which
//! graphics backends can consume it. The table is process-wide and read-only.

use crate::backend::{Platform, ShaderModel, TargetApi};

/// Capabilities of a single shader model.
#[derive(Debug, Clone)]
pub struct ShaderModelCaps {
    /// The shader model described
    pub model: ShaderModel,
    /// Deployment class (`Desktop` or `Mobile`)
    pub platform: Platform,
    /// Backends able to consume shaders of this model
    pub apis: &'static [TargetApi],
}

impl ShaderModelCaps {
    pub fn supports(&self, api: TargetApi) -> bool {
        self.apis.contains(&api)
    }
}

/// Built-in capability table, in canonical shader model order.
pub const SHADER_MODEL_CAPS: &[ShaderModelCaps] = &[
    ShaderModelCaps {
        model: ShaderModel::GlEs30,
        platform: Platform::Mobile,
        apis: &[TargetApi::OpenGl, TargetApi::Vulkan],
    },
    ShaderModelCaps {
        model: ShaderModel::GlCore41,
        platform: Platform::Desktop,
        apis: &[TargetApi::OpenGl, TargetApi::Vulkan],
    },
];

/// Look up the capabilities of a shader model in a table.
pub fn caps_for(table: &[ShaderModelCaps], model: ShaderModel) -> Option<&ShaderModelCaps> {
    table.iter().find(|caps| caps.model == model)
}
