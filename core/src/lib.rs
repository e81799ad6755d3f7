//! matforge core - material building and shader permutation orchestration
//!
//! Turns a declarative material description into every shader variant a runtime
//! renderer needs, packaged as a [`MaterialPackage`].
//!
//! # Architecture
//!
//! - [`MaterialBuilder`] - Accumulates the material and build settings; terminal `build()`
//! - [`resolver`] - Maps platform and API onto ordered [`CodeGenJob`]s
//! - [`VariantFilter`] - Selects the variants generated for every job
//! - [`normalize`] - Pure validation of accumulated state into a [`MaterialDescriptor`]
//! - [`Orchestrator`] - Runs the (job x variant x stage) units and feeds a [`PackageSink`]
//! - [`ShaderGenerator`] / [`PostProcessor`] - Injected capabilities
//! - [`SpirvLowering`] - Post-processor lowering Vulkan GLSL to SPIR-V (feature `spirv`)
//! - [`BuildConfig`] - TOML build settings
//!
//! # Example
//!
//! ```
//! use matforge_core::{MaterialBuilder, Platform, ShaderStage, TargetApi, UniformType};
//!
//! let mut builder = MaterialBuilder::new();
//! builder
//!     .name("tinted")
//!     .platform(Platform::All)
//!     .target_api(TargetApi::OpenGl)
//!     .parameter("tint", UniformType::Float4)
//!     .unwrap()
//!     .material(
//!         "void material(inout MaterialInputs material) {\n\
//!              prepareMaterial(material);\n\
//!              material.baseColor = materialParams.tint;\n\
//!          }\n",
//!         0,
//!     );
//!
//! let (source, _model) = builder.peek(ShaderStage::Fragment).unwrap();
//! assert!(source.contains("materialParams.tint"));
//!
//! let package = builder.build().unwrap();
//! assert_eq!(package.jobs.len(), 2);
//! ```

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod post_process;
pub mod render_state;
pub mod resolver;
#[cfg(feature = "spirv")]
pub mod spirv;
pub mod tables;
pub mod variant_filter;

pub use builder::{BuilderState, MaterialBuilder};
pub use config::BuildConfig;
pub use descriptor::{MaterialDescriptor, MaterialDraft, ShaderSource, normalize};
pub use error::{BuildError, ConfigError, UnitError, UnitErrorKind};
pub use generator::{GenerationError, GlslGenerator, ShaderGenerator};
pub use orchestrator::{BuildUnit, Orchestrator};
pub use post_process::{PostProcessError, PostProcessInput, PostProcessOutput, PostProcessor};
pub use render_state::{DEFAULT_MASK_THRESHOLD, RenderState};
pub use resolver::{resolve, resolve_with};
#[cfg(feature = "spirv")]
pub use spirv::SpirvLowering;
pub use tables::{MAX_PARAMETERS_COUNT, ParameterTable, PropertySet, VariableTable};
pub use variant_filter::VariantFilter;

// Re-export the package and vocabulary types used in builder signatures
pub use matforge_package::{
    AssemblerError, MaterialHeader, MaterialPackage, PackageAssembler, PackageSink,
    ShaderArtifact,
};
pub use matforge_shared::{
    BlendingMode, CodeGenJob, CullingMode, Interpolation, Parameter, Platform, Precision,
    Property, SamplerFormat, SamplerType, Shading, ShaderModel, ShaderStage, TargetApi,
    TransparencyMode, UniformType, Variable, Variant, VertexAttribute, VertexDomain,
};
