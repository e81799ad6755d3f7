//! Build configuration (TOML)
//!
//! Describes how a material is built, not the material itself:
//!
//! ```toml
//! platform = "all"
//! target_api = "vulkan"
//! codegen_target_api = "vulkan"
//! variant_filter = 0x08
//! parallel = true
//! ```
//!
//! Every field is optional and falls back to the builder's defaults.

use std::path::Path;

use anyhow::Context;
use matforge_shared::{Platform, TargetApi};
use serde::{Deserialize, Serialize};

use crate::builder::MaterialBuilder;

/// Build settings loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Deployment platform (default: desktop)
    #[serde(default)]
    pub platform: Platform,
    /// Runtime graphics API (default: opengl)
    #[serde(default)]
    pub target_api: TargetApi,
    /// Code generation override applied to every job (default: none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codegen_target_api: Option<TargetApi>,
    /// Excluded variant flags (default: 0)
    #[serde(default)]
    pub variant_filter: u8,
    /// Generate shaders in parallel (default: true)
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            target_api: TargetApi::default(),
            codegen_target_api: None,
            variant_filter: 0,
            parallel: default_true(),
        }
    }
}

impl BuildConfig {
    /// Parse a configuration from TOML text
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Failed to parse build configuration")
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read build configuration {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("In {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded build configuration");
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize build configuration")
    }

    /// Copy these settings into a builder
    pub fn apply(&self, builder: &mut MaterialBuilder) {
        builder
            .platform(self.platform)
            .target_api(self.target_api)
            .variant_filter(self.variant_filter)
            .parallel(self.parallel);
        if let Some(api) = self.codegen_target_api {
            builder.codegen_target_api(api);
        }
    }
}
