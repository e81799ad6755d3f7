//! Material parameter declarations (uniforms and samplers).

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Element type of a uniform parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum UniformType {
    Bool,
    Bool2,
    Bool3,
    Bool4,
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    Int2,
    Int3,
    Int4,
    Uint,
    Uint2,
    Uint3,
    Uint4,
    Mat3,
    Mat4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum SamplerType {
    Sampler2d,
    SamplerCubemap,
    /// Externally managed source (e.g. a camera or video stream); dictates its own
    /// format and precision
    SamplerExternal,
}

impl SamplerType {
    pub fn is_external(self) -> bool {
        self == SamplerType::SamplerExternal
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum SamplerFormat {
    Int,
    Uint,
    #[default]
    Float,
    Shadow,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Low,
    Medium,
    High,
    #[default]
    Default,
}

/// A declared material parameter.
///
/// Uniforms and samplers share one parameter table and are told apart by variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum Parameter {
    Uniform {
        name: String,
        uniform_type: UniformType,
        /// Array size (1 for non-array uniforms)
        size: u32,
    },
    Sampler {
        name: String,
        sampler_type: SamplerType,
        format: SamplerFormat,
        precision: Precision,
    },
}

impl Parameter {
    pub fn uniform(name: impl Into<String>, uniform_type: UniformType) -> Self {
        Self::uniform_array(name, uniform_type, 1)
    }

    pub fn uniform_array(name: impl Into<String>, uniform_type: UniformType, size: u32) -> Self {
        Parameter::Uniform {
            name: name.into(),
            uniform_type,
            size,
        }
    }

    /// Create a sampler parameter.
    ///
    /// External samplers ignore `format` and `precision`; they are stored as defaults.
    pub fn sampler(
        name: impl Into<String>,
        sampler_type: SamplerType,
        format: SamplerFormat,
        precision: Precision,
    ) -> Self {
        let (format, precision) = if sampler_type.is_external() {
            (SamplerFormat::default(), Precision::default())
        } else {
            (format, precision)
        };
        Parameter::Sampler {
            name: name.into(),
            sampler_type,
            format,
            precision,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Parameter::Uniform { name, .. } | Parameter::Sampler { name, .. } => name,
        }
    }

    pub fn is_sampler(&self) -> bool {
        matches!(self, Parameter::Sampler { .. })
    }

    pub fn is_external_sampler(&self) -> bool {
        matches!(
            self,
            Parameter::Sampler {
                sampler_type: SamplerType::SamplerExternal,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_sampler_drops_format_and_precision() {
        let p = Parameter::sampler(
            "video",
            SamplerType::SamplerExternal,
            SamplerFormat::Shadow,
            Precision::High,
        );
        assert_eq!(
            p,
            Parameter::Sampler {
                name: "video".to_string(),
                sampler_type: SamplerType::SamplerExternal,
                format: SamplerFormat::Float,
                precision: Precision::Default,
            }
        );
        assert!(p.is_external_sampler());
    }

    #[test]
    fn test_regular_sampler_keeps_format_and_precision() {
        let p = Parameter::sampler(
            "shadowMap",
            SamplerType::Sampler2d,
            SamplerFormat::Shadow,
            Precision::High,
        );
        match p {
            Parameter::Sampler {
                format, precision, ..
            } => {
                assert_eq!(format, SamplerFormat::Shadow);
                assert_eq!(precision, Precision::High);
            }
            _ => panic!("expected a sampler"),
        }
        assert!(!p.is_external_sampler());
    }

    #[test]
    fn test_uniform_defaults_to_single_element() {
        let p = Parameter::uniform("tint", UniformType::Float4);
        assert_eq!(p.name(), "tint");
        assert!(!p.is_sampler());
        assert!(matches!(p, Parameter::Uniform { size: 1, .. }));
    }
}
