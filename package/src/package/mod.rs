//! Material package format (`.matpkg`)
//!
//! A package holds every shader generated for one material, for every resolved
//! code generation job, variant and stage, plus the material header the runtime
//! needs to set up pipeline state.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Magic (4 bytes): "MATP"                     │
//! ├──────────────────────────────────────────────┤
//! │  MaterialPackage (bitcode serialized)        │
//! │  ├── version: u32                            │
//! │  ├── header: MaterialHeader                  │
//! │  ├── jobs: Vec<CodeGenJob>                   │
//! │  ├── shaders: Vec<ShaderRecord>              │
//! │  ├── text_dictionary: Vec<String>            │
//! │  └── binary_dictionary: Vec<Vec<u32>>        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Shader records are stored in canonical order (job, then variant, then stage).
//! Identical shader texts and binaries are stored once in the dictionaries.

mod types;


pub use types::*;

use anyhow::Context;
use bitcode::{Decode, Encode};
use hashbrown::{HashMap, HashSet};
use matforge_shared::{CodeGenJob, MATERIAL_PACKAGE_FORMAT, ShaderModel, ShaderStage, TargetApi};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Compiled material package
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct MaterialPackage {
    /// Package format version
    pub version: u32,

    /// Material header
    pub header: MaterialHeader,

    /// Every job the build resolved, including jobs that produced no shaders
    pub jobs: Vec<CodeGenJob>,

    /// Shader records in canonical order
    pub shaders: Vec<ShaderRecord>,

    /// Deduplicated shader texts
    pub text_dictionary: Vec<String>,

    /// Deduplicated shader binaries (SPIR-V words)
    pub binary_dictionary: Vec<Vec<u32>>,

    // Lookup cache, built lazily on first access
    #[serde(skip)]
    #[bitcode(skip)]
    shader_index: OnceLock<HashMap<ShaderKey, usize>>,
}

impl MaterialPackage {
    /// Create an empty package for a material
    pub fn new(header: MaterialHeader, jobs: Vec<CodeGenJob>) -> Self {
        Self {
            version: MATERIAL_PACKAGE_FORMAT.version,
            header,
            jobs,
            shaders: Vec::new(),
            text_dictionary: Vec::new(),
            binary_dictionary: Vec::new(),
            shader_index: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Check if the package contains no shaders
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Find a shader (O(1) lookup via lazy-initialized hash index)
    pub fn find_shader(
        &self,
        shader_model: ShaderModel,
        target_api: TargetApi,
        variant: u8,
        stage: ShaderStage,
    ) -> Option<&ShaderRecord> {
        let index = self.shader_index.get_or_init(|| {
            self.shaders
                .iter()
                .enumerate()
                .map(|(i, record)| (record.key(), i))
                .collect()
        });
        let key = ShaderKey {
            shader_model,
            target_api,
            variant,
            stage,
        };
        index.get(&key).map(|&i| &self.shaders[i])
    }

    /// Text of a shader record, if it has one
    pub fn text(&self, record: &ShaderRecord) -> Option<&str> {
        record
            .text
            .and_then(|i| self.text_dictionary.get(i as usize))
            .map(String::as_str)
    }

    /// Binary of a shader record, if it has one
    pub fn binary(&self, record: &ShaderRecord) -> Option<&[u32]> {
        record
            .binary
            .and_then(|i| self.binary_dictionary.get(i as usize))
            .map(Vec::as_slice)
    }

    /// Shader records produced by one job, in canonical order
    pub fn shaders_for_job<'a>(
        &'a self,
        job: &'a CodeGenJob,
    ) -> impl Iterator<Item = &'a ShaderRecord> + 'a {
        self.shaders.iter().filter(move |record| {
            record.shader_model == job.shader_model && record.target_api == job.target_api
        })
    }

    /// Number of distinct variants generated for one job
    pub fn variant_count(&self, job: &CodeGenJob) -> usize {
        self.shaders_for_job(job)
            .map(|record| record.variant)
            .collect::<HashSet<u8>>()
            .len()
    }

    /// Serialize package to bytes with magic header
    ///
    /// The output format is:
    /// - 4 bytes: Magic bytes "MATP"
    /// - Remaining bytes: Bitcode-encoded MaterialPackage struct
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let mut bytes = MATERIAL_PACKAGE_FORMAT.magic.to_vec();
        bytes.extend(bitcode::encode(self));
        Ok(bytes)
    }

    /// Deserialize a package from bytes and validate it
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() < 4 || &bytes[0..4] != MATERIAL_PACKAGE_FORMAT.magic {
            anyhow::bail!(
                "Invalid MATP magic bytes (expected: {:?})",
                std::str::from_utf8(MATERIAL_PACKAGE_FORMAT.magic).unwrap_or("MATP")
            );
        }

        let package: MaterialPackage = bitcode::decode(&bytes[4..])
            .map_err(|e| anyhow::anyhow!("Failed to decode material package: {}", e))?;

        package
            .validate()
            .with_context(|| format!("Invalid material package '{}'", package.header.name))?;

        Ok(package)
    }

    /// Validate package structure
    ///
    /// Checks:
    /// - Version is supported
    /// - Every record belongs to a listed job
    /// - Every record has a text or a binary, and dictionary indices are in range
    /// - No two records share a lookup key
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.version > MATERIAL_PACKAGE_FORMAT.version {
            anyhow::bail!(
                "Unsupported package version: {} (max supported: {})",
                self.version,
                MATERIAL_PACKAGE_FORMAT.version
            );
        }

        let mut seen: HashMap<ShaderKey, usize> = HashMap::new();
        for (i, record) in self.shaders.iter().enumerate() {
            let job_listed = self.jobs.iter().any(|job| {
                job.shader_model == record.shader_model
                    && job.target_api == record.target_api
                    && job.codegen_target_api == record.codegen_target_api
            });
            if !job_listed {
                anyhow::bail!(
                    "Shader {} references unlisted job {}/{}",
                    i,
                    record.shader_model,
                    record.target_api
                );
            }

            if record.text.is_none() && record.binary.is_none() {
                anyhow::bail!("Shader {} has neither text nor binary", i);
            }
            if let Some(t) = record
                .text
                .filter(|&t| t as usize >= self.text_dictionary.len())
            {
                anyhow::bail!("Shader {} text index {} out of range", i, t);
            }
            if let Some(b) = record
                .binary
                .filter(|&b| b as usize >= self.binary_dictionary.len())
            {
                anyhow::bail!("Shader {} binary index {} out of range", i, b);
            }

            if let Some(first) = seen.insert(record.key(), i) {
                anyhow::bail!("Shaders {} and {} share the same key", first, i);
            }
        }

        Ok(())
    }
}
