//! Material builder.
//!
//! A [`MaterialBuilder`] accumulates a material description and build settings, then
//! produces a package with a single terminal [`build`](MaterialBuilder::build) call.
//!
//! ```text
//! Accumulating ──build()──► Prepared ──► Built
//!       │                      │
//!       └──────────────────────┴───────► Failed
//! ```
//!
//! `Built` and `Failed` are terminal: a second `build` is rejected with
//! [`BuildError::AlreadyFinished`]. [`peek`](MaterialBuilder::peek) is read-only and
//! valid in any state.

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use matforge_package::{MaterialPackage, PackageAssembler, PackageSink};
use matforge_shared::{
    BlendingMode, CodeGenJob, CullingMode, Interpolation, Parameter, Platform, Precision,
    Property, SamplerFormat, SamplerType, Shading, ShaderModel, ShaderStage, TargetApi,
    TransparencyMode, UniformType, Variable, Variant, VertexAttribute, VertexDomain,
};

use crate::descriptor::{MaterialDescriptor, MaterialDraft, ShaderSource, normalize};
use crate::error::{BuildError, ConfigError, UnitError, UnitErrorKind};
use crate::generator::{GlslGenerator, ShaderGenerator};
use crate::orchestrator::{Orchestrator, plan_units};
use crate::post_process::PostProcessor;
use crate::resolver;
use crate::variant_filter::VariantFilter;

/// Lifecycle state of a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuilderState {
    #[default]
    Accumulating,
    /// Jobs resolved, generation in progress
    Prepared,
    Built,
    Failed,
}

impl BuilderState {
    pub fn is_finished(self) -> bool {
        matches!(self, BuilderState::Built | BuilderState::Failed)
    }
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuilderState::Accumulating => "accumulating",
            BuilderState::Prepared => "prepared",
            BuilderState::Built => "built",
            BuilderState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Accumulates a material and builds its shader package.
pub struct MaterialBuilder {
    draft: MaterialDraft,
    platform: Platform,
    target_api: TargetApi,
    codegen_target_api: Option<TargetApi>,
    variant_filter: VariantFilter,
    parallel: bool,
    generator: Arc<dyn ShaderGenerator>,
    post_processor: Option<Arc<dyn PostProcessor>>,
    state: BuilderState,
    failure: Option<BuildError>,
    jobs: Vec<CodeGenJob>,
}

impl Default for MaterialBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MaterialBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialBuilder")
            .field("name", &self.draft.name)
            .field("platform", &self.platform)
            .field("target_api", &self.target_api)
            .field("codegen_target_api", &self.codegen_target_api)
            .field("variant_filter", &self.variant_filter)
            .field("parameters", &self.draft.parameters.len())
            .field("post_processor", &self.post_processor.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl MaterialBuilder {
    /// Builder using the built-in GLSL generator
    pub fn new() -> Self {
        Self::with_generator(GlslGenerator::new())
    }

    /// Builder using a custom shader generator
    pub fn with_generator(generator: impl ShaderGenerator + 'static) -> Self {
        Self::with_shared_generator(Arc::new(generator))
    }

    pub fn with_shared_generator(generator: Arc<dyn ShaderGenerator>) -> Self {
        Self {
            draft: MaterialDraft::default(),
            platform: Platform::default(),
            target_api: TargetApi::default(),
            codegen_target_api: None,
            variant_filter: VariantFilter::default(),
            parallel: true,
            generator,
            post_processor: None,
            state: BuilderState::Accumulating,
            failure: None,
            jobs: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Material description
    // ------------------------------------------------------------------

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.draft.name = name.into();
        self
    }

    pub fn shading(&mut self, shading: Shading) -> &mut Self {
        self.draft.render_state.shading = shading;
        self
    }

    pub fn interpolation(&mut self, interpolation: Interpolation) -> &mut Self {
        self.draft.render_state.interpolation = interpolation;
        self
    }

    /// Declare a uniform parameter.
    pub fn parameter(
        &mut self,
        name: impl Into<String>,
        uniform_type: UniformType,
    ) -> Result<&mut Self, ConfigError> {
        self.add_parameter(Parameter::uniform(name, uniform_type))
    }

    /// Declare a uniform array parameter.
    pub fn parameter_array(
        &mut self,
        name: impl Into<String>,
        uniform_type: UniformType,
        size: u32,
    ) -> Result<&mut Self, ConfigError> {
        self.add_parameter(Parameter::uniform_array(name, uniform_type, size))
    }

    /// Declare a sampler with default format and precision.
    pub fn sampler(
        &mut self,
        name: impl Into<String>,
        sampler_type: SamplerType,
    ) -> Result<&mut Self, ConfigError> {
        self.sampler_with(name, sampler_type, SamplerFormat::default(), Precision::default())
    }

    pub fn sampler_with_format(
        &mut self,
        name: impl Into<String>,
        sampler_type: SamplerType,
        format: SamplerFormat,
    ) -> Result<&mut Self, ConfigError> {
        self.sampler_with(name, sampler_type, format, Precision::default())
    }

    pub fn sampler_with_precision(
        &mut self,
        name: impl Into<String>,
        sampler_type: SamplerType,
        precision: Precision,
    ) -> Result<&mut Self, ConfigError> {
        self.sampler_with(name, sampler_type, SamplerFormat::default(), precision)
    }

    /// Declare a sampler. External samplers ignore `format` and `precision`.
    pub fn sampler_with(
        &mut self,
        name: impl Into<String>,
        sampler_type: SamplerType,
        format: SamplerFormat,
        precision: Precision,
    ) -> Result<&mut Self, ConfigError> {
        let name = name.into();
        if sampler_type.is_external()
            && (format != SamplerFormat::default() || precision != Precision::default())
        {
            tracing::warn!(
                parameter = %name,
                ?format,
                ?precision,
                "external sampler ignores format and precision"
            );
        }
        self.add_parameter(Parameter::sampler(name, sampler_type, format, precision))
    }

    fn add_parameter(&mut self, parameter: Parameter) -> Result<&mut Self, ConfigError> {
        self.draft.parameters.insert(parameter)?;
        Ok(self)
    }

    /// Mark a property as written by the shading code
    pub fn property(&mut self, property: Property) -> &mut Self {
        self.draft.properties.set(property);
        self
    }

    /// Name a custom interpolated variable
    pub fn variable(&mut self, variable: Variable, name: impl Into<String>) -> &mut Self {
        self.draft.variables.set(variable, name);
        self
    }

    /// Require a vertex attribute (position is always required)
    pub fn require(&mut self, attribute: VertexAttribute) -> &mut Self {
        self.draft.render_state.require(attribute);
        self
    }

    /// Fragment shading code, starting at `line` in its source file
    pub fn material(&mut self, code: impl Into<String>, line: usize) -> &mut Self {
        self.draft.material = ShaderSource::new(code, line);
        self
    }

    /// Vertex shading code, starting at `line` in its source file
    pub fn material_vertex(&mut self, code: impl Into<String>, line: usize) -> &mut Self {
        self.draft.material_vertex = ShaderSource::new(code, line);
        self
    }

    pub fn blending(&mut self, blending: BlendingMode) -> &mut Self {
        self.draft.render_state.blending = blending;
        self
    }

    pub fn vertex_domain(&mut self, domain: VertexDomain) -> &mut Self {
        self.draft.render_state.vertex_domain = domain;
        self
    }

    /// Culling mode; ignored once the material is double-sided
    pub fn culling(&mut self, culling: CullingMode) -> &mut Self {
        self.draft.render_state.culling = culling;
        self
    }

    pub fn color_write(&mut self, enable: bool) -> &mut Self {
        self.draft.render_state.color_write = enable;
        self
    }

    /// Depth write; defaults to on for opaque and masked blending, off otherwise
    pub fn depth_write(&mut self, enable: bool) -> &mut Self {
        self.draft.render_state.depth_write = Some(enable);
        self
    }

    /// Depth test
    pub fn depth_culling(&mut self, enable: bool) -> &mut Self {
        self.draft.render_state.depth_test = enable;
        self
    }

    /// Double-sidedness; once set, overrides culling regardless of call order
    pub fn double_sided(&mut self, double_sided: bool) -> &mut Self {
        self.draft.render_state.double_sided = Some(double_sided);
        self
    }

    /// Alpha threshold for masked blending
    pub fn mask_threshold(&mut self, threshold: f32) -> &mut Self {
        self.draft.render_state.mask_threshold = Some(threshold);
        self
    }

    /// Let unlit materials receive shadows
    pub fn shadow_multiplier(&mut self, enable: bool) -> &mut Self {
        self.draft.render_state.shadow_multiplier = enable;
        self
    }

    pub fn transparency_mode(&mut self, mode: TransparencyMode) -> &mut Self {
        self.draft.render_state.transparency = mode;
        self
    }

    // ------------------------------------------------------------------
    // Build settings
    // ------------------------------------------------------------------

    pub fn platform(&mut self, platform: Platform) -> &mut Self {
        self.platform = platform;
        self
    }

    pub fn target_api(&mut self, target_api: TargetApi) -> &mut Self {
        self.target_api = target_api;
        self
    }

    /// Generate code for `api` in every job, whatever the job's runtime API
    pub fn codegen_target_api(&mut self, api: TargetApi) -> &mut Self {
        self.codegen_target_api = Some(api);
        self
    }

    /// Exclude variant flags from generation (raw [`Variant`] bits)
    pub fn variant_filter(&mut self, mask: u8) -> &mut Self {
        self.variant_filter = VariantFilter::from_mask(mask);
        self
    }

    /// Run generation units on rayon's pool (on by default)
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    pub fn post_processor(&mut self, post_processor: impl PostProcessor + 'static) -> &mut Self {
        self.post_processor = Some(Arc::new(post_processor));
        self
    }

    pub fn generator(&mut self, generator: impl ShaderGenerator + 'static) -> &mut Self {
        self.generator = Arc::new(generator);
        self
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn parameter_count(&self) -> usize {
        self.draft.parameters.len()
    }

    /// Declared parameters, in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        self.draft.parameters.as_slice()
    }

    pub fn has_external_sampler(&self) -> bool {
        self.draft.parameters.has_external_sampler()
    }

    pub fn is_lit(&self) -> bool {
        self.draft.render_state.shading.is_lit()
    }

    pub fn get_name(&self) -> &str {
        &self.draft.name
    }

    pub fn get_platform(&self) -> Platform {
        self.platform
    }

    pub fn get_target_api(&self) -> TargetApi {
        self.target_api
    }

    /// Code generation override, if any
    pub fn get_codegen_target_api(&self) -> Option<TargetApi> {
        self.codegen_target_api
    }

    pub fn get_variant_filter(&self) -> u8 {
        self.variant_filter.mask()
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Why the builder failed, when it is in [`BuilderState::Failed`]
    pub fn failure_reason(&self) -> Option<&BuildError> {
        self.failure.as_ref()
    }

    /// Jobs resolved by the last build
    pub fn jobs(&self) -> &[CodeGenJob] {
        &self.jobs
    }

    // ------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------

    /// Build the material into a [`MaterialPackage`].
    pub fn build(&mut self) -> Result<MaterialPackage, BuildError> {
        self.build_with(PackageAssembler::new())
    }

    /// Build the material into a caller-provided sink.
    pub fn build_with<S: PackageSink>(&mut self, sink: S) -> Result<S::Output, BuildError> {
        if self.state != BuilderState::Accumulating {
            return Err(BuildError::AlreadyFinished(self.state));
        }

        if let Err(e) = self.prepare() {
            return Err(self.fail(e));
        }
        let descriptor = match self.prepare_to_build() {
            Ok(descriptor) => descriptor,
            Err(e) => return Err(self.fail(e.into())),
        };

        let variants = self
            .variant_filter
            .variants(descriptor.is_lit(), descriptor.shadow_multiplier);
        let units = plan_units(&self.jobs, &variants);
        tracing::info!(
            material = %descriptor.name,
            jobs = self.jobs.len(),
            variants = variants.len(),
            units = units.len(),
            "building material"
        );

        let orchestrator = Orchestrator {
            descriptor: &descriptor,
            generator: self.generator.as_ref(),
            post_processor: self.post_processor.as_deref(),
            parallel: self.parallel,
        };
        let header = descriptor.header(self.variant_filter);
        match orchestrator.execute(&units, header, &self.jobs, sink) {
            Ok(output) => {
                self.state = BuilderState::Built;
                tracing::info!(
                    material = %descriptor.name,
                    shaders = units.len(),
                    "material built"
                );
                Ok(output)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Generate the baseline shader of the first resolved job for one stage.
    ///
    /// Never runs the post-processor, never builds a package and never changes the
    /// builder's state.
    pub fn peek(&self, stage: ShaderStage) -> Result<(String, ShaderModel), BuildError> {
        let jobs = resolver::resolve(self.platform, self.target_api, self.codegen_target_api)?;
        let Some(job) = jobs.first() else {
            return Err(ConfigError::NoShaderModels {
                platform: self.platform,
                target_api: self.target_api,
            }
            .into());
        };
        let descriptor = self.prepare_to_build()?;

        let text = self
            .generator
            .generate(&descriptor, job, Variant::BASELINE, stage)
            .map_err(|e| {
                BuildError::Units(vec![UnitError {
                    job: *job,
                    variant: Variant::BASELINE.key(),
                    stage,
                    kind: UnitErrorKind::Generation(e.to_string()),
                }])
            })?;
        Ok((text, job.shader_model))
    }

    /// Resolve the shader models and jobs for this build.
    fn prepare(&mut self) -> Result<(), BuildError> {
        let jobs = resolver::resolve(self.platform, self.target_api, self.codegen_target_api)?;
        for job in &jobs {
            tracing::debug!(%job, "resolved code generation job");
        }
        self.jobs = jobs;
        self.state = BuilderState::Prepared;
        Ok(())
    }

    /// Validate and normalize the accumulated material.
    fn prepare_to_build(&self) -> Result<MaterialDescriptor, ConfigError> {
        normalize(&self.draft)
    }

    fn fail(&mut self, error: BuildError) -> BuildError {
        tracing::error!(material = %self.draft.name, error = %error, "material build failed");
        self.state = BuilderState::Failed;
        self.failure = Some(error.clone());
        error
    }
}
