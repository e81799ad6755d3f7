//! Post-processing of generated shader source.
//!
//! A post-processor receives each generated text with its stage and job, and returns
//! a replacement text, a binary form, or both. Failure is final for that unit; it is
//! never retried.

use matforge_shared::{CodeGenJob, ShaderModel, ShaderStage, Variant};

/// One generated shader handed to a post-processor
#[derive(Debug, Clone, Copy)]
pub struct PostProcessInput<'a> {
    pub text: &'a str,
    pub stage: ShaderStage,
    pub shader_model: ShaderModel,
    pub job: &'a CodeGenJob,
    pub variant: Variant,
}

/// Post-processing result; at least one of the two outputs should be set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostProcessOutput {
    pub text: Option<String>,
    /// Binary intermediate representation (e.g. SPIR-V words)
    pub binary: Option<Vec<u32>>,
}

impl PostProcessOutput {
    /// Keep the generated text unchanged
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            binary: None,
        }
    }

    /// Replace the text with a binary
    pub fn binary(words: Vec<u32>) -> Self {
        Self {
            text: None,
            binary: Some(words),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PostProcessError(pub String);

impl PostProcessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Hook run on every generated shader during a build.
pub trait PostProcessor: Send + Sync {
    fn process(&self, input: &PostProcessInput<'_>) -> Result<PostProcessOutput, PostProcessError>;
}

impl<F> PostProcessor for F
where
    F: Fn(&PostProcessInput<'_>) -> Result<PostProcessOutput, PostProcessError> + Send + Sync,
{
    fn process(&self, input: &PostProcessInput<'_>) -> Result<PostProcessOutput, PostProcessError> {
        self(input)
    }
}
