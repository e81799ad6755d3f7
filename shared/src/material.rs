//! Material-level enumerations: shading, blending, culling, properties and attributes.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Shading model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// No lighting applied; the material outputs its color directly
    Unlit,
    /// Standard physically based lighting
    #[default]
    Lit,
    /// Lit, with subsurface scattering
    Subsurface,
    /// Lit, with a cloth/fabric BRDF
    Cloth,
}

impl Shading {
    /// Anything other than `Unlit` is lit.
    pub fn is_lit(self) -> bool {
        self != Shading::Unlit
    }
}

/// How custom variables are interpolated between vertex and fragment stages
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Smooth,
    Flat,
}

/// Coordinate space vertex positions are expressed in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum VertexDomain {
    #[default]
    Object,
    World,
    View,
    Device,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendingMode {
    #[default]
    Opaque,
    Transparent,
    Add,
    /// Opaque, with fragments below the mask threshold discarded
    Masked,
}

impl BlendingMode {
    /// Whether depth writes are on when the material doesn't say otherwise.
    pub fn writes_depth_by_default(self) -> bool {
        matches!(self, BlendingMode::Opaque | BlendingMode::Masked)
    }
}

/// Which triangle faces are culled
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum CullingMode {
    None,
    Front,
    #[default]
    Back,
    FrontAndBack,
}

/// How transparent objects are rendered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum TransparencyMode {
    #[default]
    Default,
    TwoPassesOneSide,
    TwoPassesTwoSides,
}

/// Material properties a material's shading code may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    BaseColor,
    Roughness,
    Metallic,
    Reflectance,
    AmbientOcclusion,
    ClearCoat,
    ClearCoatRoughness,
    ClearCoatNormal,
    Anisotropy,
    AnisotropyDirection,
    Thickness,
    SubsurfacePower,
    SubsurfaceColor,
    Emissive,
    Normal,
}

/// Number of recognized material properties
pub const PROPERTY_COUNT: usize = 15;

impl Property {
    pub const ALL: [Property; PROPERTY_COUNT] = [
        Property::BaseColor,
        Property::Roughness,
        Property::Metallic,
        Property::Reflectance,
        Property::AmbientOcclusion,
        Property::ClearCoat,
        Property::ClearCoatRoughness,
        Property::ClearCoatNormal,
        Property::Anisotropy,
        Property::AnisotropyDirection,
        Property::Thickness,
        Property::SubsurfacePower,
        Property::SubsurfaceColor,
        Property::Emissive,
        Property::Normal,
    ];

    /// Slot of this property in a property-used table.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Custom interpolated variables (all float4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Custom0,
    Custom1,
    Custom2,
    Custom3,
}

/// Number of custom variable slots
pub const VARIABLE_COUNT: usize = 4;

impl Variable {
    pub const ALL: [Variable; VARIABLE_COUNT] = [
        Variable::Custom0,
        Variable::Custom1,
        Variable::Custom2,
        Variable::Custom3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Vertex attributes a material can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum VertexAttribute {
    Position,
    /// Tangent frame (carries the normal)
    Tangents,
    Color,
    Uv0,
    Uv1,
    BoneIndices,
    BoneWeights,
}

impl VertexAttribute {
    pub fn as_set(self) -> AttributeSet {
        match self {
            VertexAttribute::Position => AttributeSet::POSITION,
            VertexAttribute::Tangents => AttributeSet::TANGENTS,
            VertexAttribute::Color => AttributeSet::COLOR,
            VertexAttribute::Uv0 => AttributeSet::UV0,
            VertexAttribute::Uv1 => AttributeSet::UV1,
            VertexAttribute::BoneIndices => AttributeSet::BONE_INDICES,
            VertexAttribute::BoneWeights => AttributeSet::BONE_WEIGHTS,
        }
    }
}

bitflags::bitflags! {
    /// Set of required vertex attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttributeSet: u8 {
        const POSITION = 0b0000_0001;
        const TANGENTS = 0b0000_0010;
        const COLOR = 0b0000_0100;
        const UV0 = 0b0000_1000;
        const UV1 = 0b0001_0000;
        const BONE_INDICES = 0b0010_0000;
        const BONE_WEIGHTS = 0b0100_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shading_is_lit() {
        assert!(!Shading::Unlit.is_lit());
        assert!(Shading::Lit.is_lit());
        assert!(Shading::Subsurface.is_lit());
        assert!(Shading::Cloth.is_lit());
    }

    #[test]
    fn test_depth_write_defaults() {
        assert!(BlendingMode::Opaque.writes_depth_by_default());
        assert!(BlendingMode::Masked.writes_depth_by_default());
        assert!(!BlendingMode::Transparent.writes_depth_by_default());
        assert!(!BlendingMode::Add.writes_depth_by_default());
    }

    #[test]
    fn test_property_indices_are_dense() {
        for (i, property) in Property::ALL.iter().enumerate() {
            assert_eq!(property.index(), i);
        }
        for (i, variable) in Variable::ALL.iter().enumerate() {
            assert_eq!(variable.index(), i);
        }
    }

    #[test]
    fn test_attribute_bits_are_distinct() {
        let all = [
            VertexAttribute::Position,
            VertexAttribute::Tangents,
            VertexAttribute::Color,
            VertexAttribute::Uv0,
            VertexAttribute::Uv1,
            VertexAttribute::BoneIndices,
            VertexAttribute::BoneWeights,
        ];
        let mut seen = AttributeSet::empty();
        for attribute in all {
            assert!(!seen.intersects(attribute.as_set()));
            seen |= attribute.as_set();
        }
        assert_eq!(seen, AttributeSet::all());
    }
}
