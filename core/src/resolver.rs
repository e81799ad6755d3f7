//! Platform/API resolution.
//!
//! Maps a deployment platform, a target API and an optional code generation override
//! onto the ordered list of [`CodeGenJob`]s a build must produce. Jobs are ordered by
//! shader model (canonical order), then by API (`OpenGl`, `Vulkan`).

use matforge_shared::{
    CodeGenJob, Platform, SHADER_MODEL_CAPS, ShaderModelCaps, ShaderModelSet, TargetApi,
    caps_for,
};

use crate::error::ConfigError;

/// Shader models of `table` wanted by `platform` that can serve `target_api`
pub fn shader_models_with(
    table: &[ShaderModelCaps],
    platform: Platform,
    target_api: TargetApi,
) -> ShaderModelSet {
    table
        .iter()
        .filter(|caps| platform.includes(caps.platform))
        .filter(|caps| target_api.expand().iter().any(|&api| caps.supports(api)))
        .fold(ShaderModelSet::empty(), |set, caps| set | caps.model.as_set())
}

/// Resolve jobs against an explicit capability table.
pub fn resolve_with(
    table: &[ShaderModelCaps],
    platform: Platform,
    target_api: TargetApi,
    codegen_override: Option<TargetApi>,
) -> Result<Vec<CodeGenJob>, ConfigError> {
    if codegen_override.is_some_and(|api| !api.is_concrete()) {
        return Err(ConfigError::InvalidCodeGenTarget);
    }

    let models = shader_models_with(table, platform, target_api);
    let mut jobs = Vec::new();
    for model in models.models() {
        let Some(caps) = caps_for(table, model) else {
            continue;
        };
        for &api in target_api.expand() {
            if caps.supports(api) {
                jobs.push(CodeGenJob::new(model, api, codegen_override.unwrap_or(api)));
            }
        }
    }

    if jobs.is_empty() {
        return Err(ConfigError::NoShaderModels {
            platform,
            target_api,
        });
    }
    Ok(jobs)
}

/// Resolve jobs against the built-in capability table.
pub fn resolve(
    platform: Platform,
    target_api: TargetApi,
    codegen_override: Option<TargetApi>,
) -> Result<Vec<CodeGenJob>, ConfigError> {
    resolve_with(SHADER_MODEL_CAPS, platform, target_api, codegen_override)
}
