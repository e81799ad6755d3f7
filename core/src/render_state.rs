//! Render-state accumulation.
//!
//! Settings whose effective value depends on other settings (`double_sided`,
//! `depth_write`, `mask_threshold`) are stored as `Option` so normalization can tell
//! "explicitly set" apart from "left at default".

use matforge_shared::{
    AttributeSet, BlendingMode, CullingMode, Interpolation, Shading, TransparencyMode,
    VertexAttribute, VertexDomain,
};

/// Default alpha threshold for masked blending
pub const DEFAULT_MASK_THRESHOLD: f32 = 0.4;

/// Render configuration as accumulated by the builder
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub shading: Shading,
    pub interpolation: Interpolation,
    pub vertex_domain: VertexDomain,
    pub blending: BlendingMode,
    pub culling: CullingMode,
    pub transparency: TransparencyMode,
    pub color_write: bool,
    pub depth_test: bool,
    pub shadow_multiplier: bool,
    /// Explicit double-sidedness; overrides culling once set
    pub double_sided: Option<bool>,
    /// Explicit depth write; otherwise derived from blending
    pub depth_write: Option<bool>,
    /// Explicit mask threshold; only used with masked blending
    pub mask_threshold: Option<f32>,
    /// Attributes requested by the user (position is implied)
    pub required_attributes: AttributeSet,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            shading: Shading::default(),
            interpolation: Interpolation::default(),
            vertex_domain: VertexDomain::default(),
            blending: BlendingMode::default(),
            culling: CullingMode::default(),
            transparency: TransparencyMode::default(),
            color_write: true,
            depth_test: true,
            shadow_multiplier: false,
            double_sided: None,
            depth_write: None,
            mask_threshold: None,
            required_attributes: AttributeSet::empty(),
        }
    }
}

impl RenderState {
    pub fn require(&mut self, attribute: VertexAttribute) {
        self.required_attributes |= attribute.as_set();
    }

    /// Culling after double-sidedness is applied
    pub fn effective_culling(&self) -> CullingMode {
        match self.double_sided {
            Some(true) => CullingMode::None,
            _ => self.culling,
        }
    }

    /// Depth write after the blending-based default is applied
    pub fn effective_depth_write(&self) -> bool {
        self.depth_write
            .unwrap_or_else(|| self.blending.writes_depth_by_default())
    }

    /// Mask threshold, or the default when unset
    pub fn effective_mask_threshold(&self) -> f32 {
        self.mask_threshold.unwrap_or(DEFAULT_MASK_THRESHOLD)
    }

    /// Attributes every vertex stream must provide.
    ///
    /// Position is always required; lit shading needs the tangent frame.
    pub fn effective_attributes(&self) -> AttributeSet {
        let mut attributes = self.required_attributes | AttributeSet::POSITION;
        if self.shading.is_lit() {
            attributes |= AttributeSet::TANGENTS;
        }
        attributes
    }
}
