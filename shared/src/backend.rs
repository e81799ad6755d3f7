//! Deployment platforms, graphics APIs, shader models and shader stages.

use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// High-level deployment hint.
///
/// Works in concert with [`TargetApi`] to decide which shader models are generated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Desktop,
    Mobile,
    All,
}

impl Platform {
    /// Whether a shader model of the given deployment class is wanted by this platform.
    ///
    /// `class` is always a concrete platform (`Desktop` or `Mobile`).
    pub fn includes(self, class: Platform) -> bool {
        match self {
            Platform::All => true,
            concrete => concrete == class,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Desktop => "desktop",
            Platform::Mobile => "mobile",
            Platform::All => "all",
        };
        f.write_str(name)
    }
}

/// Graphics backend a shader is generated for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetApi {
    All,
    #[default]
    #[serde(rename = "opengl")]
    OpenGl,
    Vulkan,
}

impl TargetApi {
    /// Every concrete backend, in canonical job order.
    pub const CONCRETE: [TargetApi; 2] = [TargetApi::OpenGl, TargetApi::Vulkan];

    /// Expand `All` into the concrete backends; a concrete value expands to itself.
    pub fn expand(self) -> &'static [TargetApi] {
        match self {
            TargetApi::All => &Self::CONCRETE,
            TargetApi::OpenGl => &[TargetApi::OpenGl],
            TargetApi::Vulkan => &[TargetApi::Vulkan],
        }
    }

    pub fn is_concrete(self) -> bool {
        self != TargetApi::All
    }
}

impl fmt::Display for TargetApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetApi::All => "all",
            TargetApi::OpenGl => "opengl",
            TargetApi::Vulkan => "vulkan",
        };
        f.write_str(name)
    }
}

/// Shading-language dialect a shader is generated against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode,
    Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum ShaderModel {
    /// OpenGL ES 3.0 (mobile)
    GlEs30,
    /// OpenGL 4.1 core profile (desktop)
    GlCore41,
}

impl ShaderModel {
    /// All shader models, in canonical job order.
    pub const ALL: [ShaderModel; 2] = [ShaderModel::GlEs30, ShaderModel::GlCore41];

    pub fn name(self) -> &'static str {
        match self {
            ShaderModel::GlEs30 => "gl_es_30",
            ShaderModel::GlCore41 => "gl_core_41",
        }
    }

    /// Bit of this model inside a [`ShaderModelSet`].
    pub fn as_set(self) -> ShaderModelSet {
        match self {
            ShaderModel::GlEs30 => ShaderModelSet::GL_ES_30,
            ShaderModel::GlCore41 => ShaderModelSet::GL_CORE_41,
        }
    }
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Set of shader models selected for a build.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderModelSet: u8 {
        const GL_ES_30 = 0b0000_0001;
        const GL_CORE_41 = 0b0000_0010;
    }
}

impl ShaderModelSet {
    /// Iterate the models in this set in canonical order.
    pub fn models(self) -> impl Iterator<Item = ShaderModel> {
        ShaderModel::ALL
            .into_iter()
            .filter(move |model| self.contains(model.as_set()))
    }
}

/// Programmable pipeline stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode,
    Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Stages in canonical package order.
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// One shader-generation job: which dialect, which runtime API, and which API the
/// code generator should actually target.
///
/// `codegen_target_api` differs from `target_api` only when a build overrides the
/// code generation target, e.g. when a post-processor consumes a different
/// intermediate form than the runtime API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct CodeGenJob {
    pub shader_model: ShaderModel,
    pub target_api: TargetApi,
    pub codegen_target_api: TargetApi,
}

impl CodeGenJob {
    pub fn new(
        shader_model: ShaderModel,
        target_api: TargetApi,
        codegen_target_api: TargetApi,
    ) -> Self {
        Self {
            shader_model,
            target_api,
            codegen_target_api,
        }
    }
}

impl fmt::Display for CodeGenJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target_api == self.codegen_target_api {
            write!(f, "{}/{}", self.shader_model, self.target_api)
        } else {
            write!(
                f,
                "{}/{} (codegen: {})",
                self.shader_model, self.target_api, self.codegen_target_api
            )
        }
    }
}
