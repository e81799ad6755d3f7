//! GLSL to SPIR-V lowering using naga.
//!
//! [`SpirvLowering`] is a ready-made [`PostProcessor`]: for jobs whose runtime API is
//! Vulkan it parses the generated GLSL, validates the module and replaces the text
//! with SPIR-V words. Every other job passes through with its text unchanged.

use matforge_shared::{ShaderStage, TargetApi};

use crate::post_process::{PostProcessError, PostProcessInput, PostProcessOutput, PostProcessor};

/// Post-processor lowering Vulkan shaders to SPIR-V
#[derive(Debug, Clone, Copy, Default)]
pub struct SpirvLowering {
    keep_text: bool,
}

impl SpirvLowering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keep the GLSL text next to the SPIR-V binary
    pub fn keep_text(mut self, keep: bool) -> Self {
        self.keep_text = keep;
        self
    }
}

impl PostProcessor for SpirvLowering {
    fn process(&self, input: &PostProcessInput<'_>) -> Result<PostProcessOutput, PostProcessError> {
        if input.job.target_api != TargetApi::Vulkan {
            return Ok(PostProcessOutput::text(input.text));
        }

        let words = glsl_to_spirv(input.text, input.stage)?;
        tracing::debug!(
            job = %input.job,
            variant = input.variant.key(),
            stage = %input.stage,
            words = words.len(),
            "lowered shader to SPIR-V"
        );
        Ok(PostProcessOutput {
            text: self.keep_text.then(|| input.text.to_string()),
            binary: Some(words),
        })
    }
}

/// Parse, validate and lower one GLSL shader to SPIR-V words.
pub fn glsl_to_spirv(source: &str, stage: ShaderStage) -> Result<Vec<u32>, PostProcessError> {
    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    let mut frontend = naga::front::glsl::Frontend::default();
    let module = frontend
        .parse(&naga::front::glsl::Options::from(naga_stage), source)
        .map_err(|e| PostProcessError::new(format!("GLSL parse error: {:?}", e)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    let info = validator
        .validate(&module)
        .map_err(|e| PostProcessError::new(format!("validation error: {:?}", e)))?;

    naga::back::spv::write_vec(&module, &info, &naga::back::spv::Options::default(), None)
        .map_err(|e| PostProcessError::new(format!("SPIR-V write error: {:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matforge_shared::{CodeGenJob, ShaderModel, Variant};

    const VERTEX: &str = "#version 450
layout(location = 0) in vec4 position;
void main() {
    gl_Position = position;
}
";

    const FRAGMENT: &str = "#version 450
layout(location = 0) out vec4 color;
void main() {
    color = vec4(1.0, 0.0, 0.0, 1.0);
}
";

    const SPIRV_MAGIC: u32 = 0x0723_0203;

    fn input<'a>(job: &'a CodeGenJob, text: &'a str, stage: ShaderStage) -> PostProcessInput<'a> {
        PostProcessInput {
            text,
            stage,
            shader_model: job.shader_model,
            job,
            variant: Variant::BASELINE,
        }
    }

    #[test]
    fn test_lowers_vulkan_shaders() {
        let job = CodeGenJob::new(ShaderModel::GlCore41, TargetApi::Vulkan, TargetApi::Vulkan);
        for (text, stage) in [(VERTEX, ShaderStage::Vertex), (FRAGMENT, ShaderStage::Fragment)] {
            let output = SpirvLowering::new()
                .process(&input(&job, text, stage))
                .unwrap();
            let words = output.binary.unwrap();
            assert_eq!(words[0], SPIRV_MAGIC);
            assert!(output.text.is_none());
        }
    }

    #[test]
    fn test_keep_text() {
        let job = CodeGenJob::new(ShaderModel::GlEs30, TargetApi::Vulkan, TargetApi::Vulkan);
        let output = SpirvLowering::new()
            .keep_text(true)
            .process(&input(&job, VERTEX, ShaderStage::Vertex))
            .unwrap();
        assert_eq!(output.text.as_deref(), Some(VERTEX));
        assert!(output.binary.is_some());
    }

    #[test]
    fn test_opengl_passes_through() {
        let job = CodeGenJob::new(ShaderModel::GlCore41, TargetApi::OpenGl, TargetApi::OpenGl);
        let output = SpirvLowering::new()
            .process(&input(&job, "not even glsl", ShaderStage::Fragment))
            .unwrap();
        assert_eq!(output, PostProcessOutput::text("not even glsl"));
    }

    #[test]
    fn test_invalid_glsl_fails() {
        let job = CodeGenJob::new(ShaderModel::GlCore41, TargetApi::Vulkan, TargetApi::Vulkan);
        let broken = "#version 450\nvoid main() { undefined_call(); }\n";
        let err = SpirvLowering::new()
            .process(&input(&job, broken, ShaderStage::Vertex))
            .unwrap_err();
        assert!(err.0.contains("GLSL parse error"));
    }
}
