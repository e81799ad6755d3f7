//! Shared vocabulary for the matforge material build pipeline.
//!
//! This crate holds the types every other crate agrees on:
//! - `matforge-package` (package container and assembler)
//! - `matforge-core` (builder, resolver and build orchestration)
//!
//! # Modules
//!
//! - [`backend`] - Platforms, graphics APIs, shader models, stages and code generation jobs
//! - [`capabilities`] - Read-only shader model capability table
//! - [`material`] - Shading, blending, culling, properties, variables and vertex attributes
//! - [`parameter`] - Uniform and sampler parameter declarations
//! - [`variant`] - Runtime variant keys and their stage ownership
//! - [`package_format`] - Package file constants

pub mod backend;
pub mod capabilities;
pub mod material;
pub mod package_format;
pub mod parameter;
pub mod variant;

pub use backend::{CodeGenJob, Platform, ShaderModel, ShaderModelSet, ShaderStage, TargetApi};
pub use capabilities::{SHADER_MODEL_CAPS, ShaderModelCaps, caps_for};
pub use material::{
    AttributeSet, BlendingMode, CullingMode, Interpolation, PROPERTY_COUNT, Property, Shading,
    TransparencyMode, VARIABLE_COUNT, Variable, VertexAttribute, VertexDomain,
};
pub use package_format::{MATERIAL_PACKAGE_FORMAT, PackageFormat};
pub use parameter::{Parameter, Precision, SamplerFormat, SamplerType, UniformType};
pub use variant::{VARIANT_COUNT, Variant};
