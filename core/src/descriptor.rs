//! Canonical material description.
//!
//! The builder accumulates a [`MaterialDraft`]; [`normalize`] turns it into a
//! validated, read-only [`MaterialDescriptor`] without side effects.

use matforge_package::MaterialHeader;
use matforge_shared::{
    AttributeSet, BlendingMode, CullingMode, Interpolation, Parameter, Shading, TransparencyMode,
    VertexDomain,
};

use crate::error::ConfigError;
use crate::render_state::RenderState;
use crate::tables::{ParameterTable, PropertySet, VariableTable};
use crate::variant_filter::VariantFilter;

/// Fragment entry point used when the material provides no code
pub const DEFAULT_MATERIAL_CODE: &str =
    "void material(inout MaterialInputs material) {\n    prepareMaterial(material);\n}\n";

/// Vertex entry point used when the material provides no vertex code
pub const DEFAULT_MATERIAL_VERTEX_CODE: &str =
    "void materialVertex(inout MaterialVertexInputs material) {\n}\n";

/// User shading code and the line it starts at in its original source file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderSource {
    pub code: String,
    pub line_offset: usize,
}

impl ShaderSource {
    pub fn new(code: impl Into<String>, line_offset: usize) -> Self {
        Self {
            code: code.into(),
            line_offset,
        }
    }

    fn or_default(&self, default: &str) -> ShaderSource {
        if self.code.trim().is_empty() {
            ShaderSource::new(default, 0)
        } else {
            self.clone()
        }
    }
}

/// Everything the builder has accumulated about the material itself
#[derive(Debug, Clone, Default)]
pub struct MaterialDraft {
    pub name: String,
    pub render_state: RenderState,
    pub parameters: ParameterTable,
    pub properties: PropertySet,
    pub variables: VariableTable,
    pub material: ShaderSource,
    pub material_vertex: ShaderSource,
}

/// Validated material, as handed to shader generators
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    pub shading: Shading,
    pub interpolation: Interpolation,
    pub vertex_domain: VertexDomain,
    pub blending: BlendingMode,
    /// Effective culling (`None` when double-sided)
    pub culling: CullingMode,
    pub transparency: TransparencyMode,
    pub color_write: bool,
    pub depth_test: bool,
    /// Effective depth write
    pub depth_write: bool,
    pub double_sided: bool,
    pub shadow_multiplier: bool,
    /// Meaningful only with `BlendingMode::Masked`
    pub mask_threshold: f32,
    /// Always contains `POSITION`
    pub required_attributes: AttributeSet,
    pub properties: PropertySet,
    pub variables: VariableTable,
    pub parameters: Vec<Parameter>,
    /// Fragment shading code
    pub material: ShaderSource,
    pub material_vertex: ShaderSource,
}

impl MaterialDescriptor {
    pub fn is_lit(&self) -> bool {
        self.shading.is_lit()
    }

    pub fn has_external_sampler(&self) -> bool {
        self.parameters.iter().any(Parameter::is_external_sampler)
    }

    /// Packaged subset of the descriptor
    pub fn header(&self, filter: VariantFilter) -> MaterialHeader {
        MaterialHeader {
            name: self.name.clone(),
            shading: self.shading,
            interpolation: self.interpolation,
            vertex_domain: self.vertex_domain,
            blending: self.blending,
            culling: self.culling,
            transparency: self.transparency,
            color_write: self.color_write,
            depth_test: self.depth_test,
            depth_write: self.depth_write,
            double_sided: self.double_sided,
            shadow_multiplier: self.shadow_multiplier,
            mask_threshold: self.mask_threshold,
            required_attributes: self.required_attributes.bits(),
            properties: self.properties.bits(),
            variables: self.variables.to_vec(),
            parameters: self.parameters.clone(),
            variant_filter: filter.mask(),
        }
    }
}

/// Validate and normalize accumulated material state.
pub fn normalize(draft: &MaterialDraft) -> Result<MaterialDescriptor, ConfigError> {
    draft.parameters.validate()?;

    let state = &draft.render_state;
    let mask_threshold = state.effective_mask_threshold();
    if state.blending == BlendingMode::Masked && !(0.0..=1.0).contains(&mask_threshold) {
        return Err(ConfigError::InvalidMaskThreshold(mask_threshold));
    }

    Ok(MaterialDescriptor {
        name: draft.name.clone(),
        shading: state.shading,
        interpolation: state.interpolation,
        vertex_domain: state.vertex_domain,
        blending: state.blending,
        culling: state.effective_culling(),
        transparency: state.transparency,
        color_write: state.color_write,
        depth_test: state.depth_test,
        depth_write: state.effective_depth_write(),
        double_sided: state.double_sided.unwrap_or(false),
        shadow_multiplier: state.shadow_multiplier,
        mask_threshold,
        required_attributes: state.effective_attributes(),
        properties: draft.properties,
        variables: draft.variables.clone(),
        parameters: draft.parameters.as_slice().to_vec(),
        material: draft.material.or_default(DEFAULT_MATERIAL_CODE),
        material_vertex: draft.material_vertex.or_default(DEFAULT_MATERIAL_VERTEX_CODE),
    })
}
