//! Variant filtering.
//!
//! A [`VariantFilter`] is an exclusion mask applied uniformly to every job. The
//! variants actually generated also depend on the material's shading: unlit materials
//! never get lighting variants.

use matforge_shared::{ShaderStage, Variant};

/// Variant flags excluded from generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VariantFilter(Variant);

impl VariantFilter {
    /// Filter from a raw 8-bit mask. Bits outside the defined flags are ignored.
    pub fn from_mask(mask: u8) -> Self {
        Self(Variant::from_bits_truncate(mask))
    }

    pub fn mask(self) -> u8 {
        self.0.bits()
    }

    /// Flags left for generation after exclusion
    pub fn effective_flags(self) -> Variant {
        Variant::all() - self.0
    }

    /// Variant keys to generate for a material, in ascending key order.
    ///
    /// When every flag is excluded nothing is generated, not even the baseline.
    pub fn variants(self, lit: bool, shadow_multiplier: bool) -> Vec<Variant> {
        let effective = self.effective_flags();
        if effective.is_empty() {
            return Vec::new();
        }
        Variant::enumerate()
            .filter(|key| !key.is_reserved())
            .filter(|key| effective.contains(*key))
            .filter(|key| key.filter_for_shading(lit, shadow_multiplier) == *key)
            .filter(|key| ShaderStage::ALL.iter().any(|&stage| key.has_stage(stage)))
            .collect()
    }
}

/// Stages generated for one variant, in canonical order
pub fn stages_for(variant: Variant) -> impl Iterator<Item = ShaderStage> {
    ShaderStage::ALL
        .into_iter()
        .filter(move |&stage| variant.has_stage(stage))
}
