//! Runtime shader variants.
//!
//! A variant key is a combination of the flags below. Every material is compiled once
//! per applicable key; the renderer selects the key at draw time.
//!
//! - `DEPTH` keys are depth-only and never combine with lighting or shadow flags
//! - Vertex programs exist for keys made only of vertex-relevant flags
//! - Fragment programs exist for keys made only of fragment-relevant flags

use crate::backend::ShaderStage;

bitflags::bitflags! {
    /// Variant key, also used as an exclusion mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct Variant: u8 {
        /// A directional light is present
        const DIRECTIONAL_LIGHTING = 0x01;
        /// Point, spot or area lights are present
        const DYNAMIC_LIGHTING = 0x02;
        /// The renderable receives shadows
        const SHADOW_RECEIVER = 0x04;
        /// GPU skinning and/or morphing
        const SKINNING = 0x08;
        /// Depth-only pass
        const DEPTH = 0x10;
    }
}

/// Number of variant keys (all combinations of the defined flags)
pub const VARIANT_COUNT: usize = 32;

impl Variant {
    /// Key with no flags set
    pub const BASELINE: Variant = Variant::empty();

    /// Flags that change lighting or shadowing
    pub const LIGHTING_MASK: Variant = Variant::DIRECTIONAL_LIGHTING
        .union(Variant::DYNAMIC_LIGHTING)
        .union(Variant::SHADOW_RECEIVER);

    /// Flags that affect the vertex program
    pub const VERTEX_MASK: Variant = Variant::DIRECTIONAL_LIGHTING
        .union(Variant::SHADOW_RECEIVER)
        .union(Variant::SKINNING)
        .union(Variant::DEPTH);

    /// Flags that affect the fragment program
    pub const FRAGMENT_MASK: Variant = Variant::LIGHTING_MASK;

    /// Every key of the enumeration, reserved keys included, in ascending order.
    pub fn enumerate() -> impl Iterator<Item = Variant> {
        (0..VARIANT_COUNT as u8).map(Variant::from_bits_retain)
    }

    pub fn key(self) -> u8 {
        self.bits()
    }

    /// Depth keys combined with lighting or shadow flags are never valid.
    pub fn is_reserved(self) -> bool {
        self.contains(Variant::DEPTH) && self.intersects(Variant::LIGHTING_MASK)
    }

    /// Whether this key owns a program for `stage`.
    pub fn has_stage(self, stage: ShaderStage) -> bool {
        match stage {
            ShaderStage::Vertex => Variant::VERTEX_MASK.contains(self),
            ShaderStage::Fragment => Variant::FRAGMENT_MASK.contains(self),
        }
    }

    /// Drop flags that have no meaning for the material's shading.
    ///
    /// Unlit materials ignore lights; they keep `SHADOW_RECEIVER` only when the
    /// shadow multiplier is enabled.
    pub fn filter_for_shading(self, lit: bool, shadow_multiplier: bool) -> Variant {
        if lit {
            return self;
        }
        let mut filtered = self - (Variant::DIRECTIONAL_LIGHTING | Variant::DYNAMIC_LIGHTING);
        if !shadow_multiplier {
            filtered -= Variant::SHADOW_RECEIVER;
        }
        filtered
    }
}
