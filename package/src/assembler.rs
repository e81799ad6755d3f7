//! Package sinks.
//!
//! The build orchestrator hands every successfully generated shader to a
//! [`PackageSink`], in canonical order, and then asks it to finish. The default
//! sink, [`PackageAssembler`], produces a [`MaterialPackage`] with deduplicated
//! text and binary dictionaries.

use hashbrown::HashMap;
use matforge_shared::{CodeGenJob, ShaderStage, Variant};
use xxhash_rust::xxh3::xxh3_64;

use crate::package::{MaterialHeader, MaterialPackage, ShaderRecord};

/// One generated shader, ready to be packaged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderArtifact {
    pub job: CodeGenJob,
    pub variant: Variant,
    pub stage: ShaderStage,
    /// Shader source (generated, or replaced by the post-processor)
    pub text: Option<String>,
    /// Binary intermediate form produced by the post-processor
    pub binary: Option<Vec<u32>>,
}

/// Error raised by a package sink
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblerError {
    #[error("shader submitted before the package header")]
    MissingHeader,

    #[error("{job} variant {variant:#04x} {stage} shader has neither text nor binary")]
    EmptyArtifact {
        job: CodeGenJob,
        variant: u8,
        stage: ShaderStage,
    },

    #[error("shader rejected by package sink: {0}")]
    Rejected(String),
}

/// Destination for generated shaders.
///
/// Calls arrive as `begin`, then `submit` once per shader in canonical order
/// (job, then variant, then stage), then `finish`.
pub trait PackageSink {
    type Output;

    /// Start a package for a material and its resolved jobs.
    fn begin(&mut self, header: MaterialHeader, jobs: &[CodeGenJob])
    -> Result<(), AssemblerError>;

    /// Accept one generated shader.
    fn submit(&mut self, artifact: ShaderArtifact) -> Result<(), AssemblerError>;

    /// Finalize and return the package.
    fn finish(self) -> Result<Self::Output, AssemblerError>;
}

/// Default sink producing a [`MaterialPackage`]
#[derive(Debug, Default)]
pub struct PackageAssembler {
    package: Option<MaterialPackage>,
    // Content hash -> dictionary indices with that hash
    text_lookup: HashMap<u64, Vec<u32>>,
    binary_lookup: HashMap<u64, Vec<u32>>,
}

impl PackageAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern_text(
        package: &mut MaterialPackage,
        lookup: &mut HashMap<u64, Vec<u32>>,
        text: String,
    ) -> u32 {
        let hash = xxh3_64(text.as_bytes());
        let candidates = lookup.entry(hash).or_default();
        if let Some(&existing) = candidates
            .iter()
            .find(|&&i| package.text_dictionary[i as usize] == text)
        {
            return existing;
        }
        let index = package.text_dictionary.len() as u32;
        package.text_dictionary.push(text);
        candidates.push(index);
        index
    }

    fn intern_binary(
        package: &mut MaterialPackage,
        lookup: &mut HashMap<u64, Vec<u32>>,
        words: Vec<u32>,
    ) -> u32 {
        let hash = xxh3_64(bytemuck::cast_slice(&words));
        let candidates = lookup.entry(hash).or_default();
        if let Some(&existing) = candidates
            .iter()
            .find(|&&i| package.binary_dictionary[i as usize] == words)
        {
            return existing;
        }
        let index = package.binary_dictionary.len() as u32;
        package.binary_dictionary.push(words);
        candidates.push(index);
        index
    }
}

impl PackageSink for PackageAssembler {
    type Output = MaterialPackage;

    fn begin(
        &mut self,
        header: MaterialHeader,
        jobs: &[CodeGenJob],
    ) -> Result<(), AssemblerError> {
        if self.package.is_some() {
            return Err(AssemblerError::Rejected(format!(
                "package for '{}' already started",
                header.name
            )));
        }
        self.package = Some(MaterialPackage::new(header, jobs.to_vec()));
        Ok(())
    }

    fn submit(&mut self, artifact: ShaderArtifact) -> Result<(), AssemblerError> {
        let package = self.package.as_mut().ok_or(AssemblerError::MissingHeader)?;

        if artifact.text.is_none() && artifact.binary.is_none() {
            return Err(AssemblerError::EmptyArtifact {
                job: artifact.job,
                variant: artifact.variant.key(),
                stage: artifact.stage,
            });
        }

        let text = artifact
            .text
            .map(|text| Self::intern_text(package, &mut self.text_lookup, text));
        let binary = artifact
            .binary
            .map(|words| Self::intern_binary(package, &mut self.binary_lookup, words));

        package.shaders.push(ShaderRecord {
            shader_model: artifact.job.shader_model,
            target_api: artifact.job.target_api,
            codegen_target_api: artifact.job.codegen_target_api,
            variant: artifact.variant.key(),
            stage: artifact.stage,
            text,
            binary,
        });
        Ok(())
    }

    fn finish(self) -> Result<MaterialPackage, AssemblerError> {
        let package = self.package.ok_or(AssemblerError::MissingHeader)?;
        package
            .validate()
            .map_err(|e| AssemblerError::Rejected(format!("{e:#}")))?;
        tracing::debug!(
            material = %package.name(),
            shaders = package.shader_count(),
            texts = package.text_dictionary.len(),
            binaries = package.binary_dictionary.len(),
            "material package assembled"
        );
        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::tests::test_header;
    use matforge_shared::{ShaderModel, TargetApi};

    fn job() -> CodeGenJob {
        CodeGenJob::new(ShaderModel::GlCore41, TargetApi::OpenGl, TargetApi::OpenGl)
    }

    fn artifact(variant: Variant, stage: ShaderStage, text: &str) -> ShaderArtifact {
        ShaderArtifact {
            job: job(),
            variant,
            stage,
            text: Some(text.to_string()),
            binary: None,
        }
    }

    #[test]
    fn test_submit_before_begin_fails() {
        let mut assembler = PackageAssembler::new();
        let result =
            assembler.submit(artifact(Variant::BASELINE, ShaderStage::Vertex, "void main() {}"));
        assert_eq!(result, Err(AssemblerError::MissingHeader));
    }

    #[test]
    fn test_identical_texts_are_stored_once() {
        let mut assembler = PackageAssembler::new();
        assembler.begin(test_header(), &[job()]).unwrap();
        assembler
            .submit(artifact(Variant::BASELINE, ShaderStage::Vertex, "shared"))
            .unwrap();
        assembler
            .submit(artifact(Variant::SKINNING, ShaderStage::Vertex, "shared"))
            .unwrap();
        assembler
            .submit(artifact(Variant::BASELINE, ShaderStage::Fragment, "other"))
            .unwrap();

        let package = assembler.finish().unwrap();
        assert_eq!(package.shader_count(), 3);
        assert_eq!(package.text_dictionary.len(), 2);
        assert_eq!(package.shaders[0].text, package.shaders[1].text);
        assert_ne!(package.shaders[0].text, package.shaders[2].text);
    }

    #[test]
    fn test_identical_binaries_are_stored_once() {
        let mut assembler = PackageAssembler::new();
        assembler.begin(test_header(), &[job()]).unwrap();
        for stage in ShaderStage::ALL {
            assembler
                .submit(ShaderArtifact {
                    job: job(),
                    variant: Variant::BASELINE,
                    stage,
                    text: None,
                    binary: Some(vec![0x0723_0203, 1, 2, 3]),
                })
                .unwrap();
        }

        let package = assembler.finish().unwrap();
        assert_eq!(package.binary_dictionary.len(), 1);
        assert!(package.text_dictionary.is_empty());
    }

    #[test]
    fn test_empty_artifact_is_rejected() {
        let mut assembler = PackageAssembler::new();
        assembler.begin(test_header(), &[job()]).unwrap();
        let result = assembler.submit(ShaderArtifact {
            job: job(),
            variant: Variant::DEPTH,
            stage: ShaderStage::Vertex,
            text: None,
            binary: None,
        });
        assert!(matches!(
            result,
            Err(AssemblerError::EmptyArtifact { variant: 0x10, .. })
        ));
    }

    #[test]
    fn test_duplicate_key_fails_on_finish() {
        let mut assembler = PackageAssembler::new();
        assembler.begin(test_header(), &[job()]).unwrap();
        assembler
            .submit(artifact(Variant::BASELINE, ShaderStage::Vertex, "a"))
            .unwrap();
        assembler
            .submit(artifact(Variant::BASELINE, ShaderStage::Vertex, "b"))
            .unwrap();
        assert!(matches!(
            assembler.finish(),
            Err(AssemblerError::Rejected(_))
        ));
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut assembler = PackageAssembler::new();
        assembler.begin(test_header(), &[job()]).unwrap();
        assert!(assembler.begin(test_header(), &[job()]).is_err());
    }
}
