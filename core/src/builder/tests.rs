//! Tests for MaterialBuilder state handling and configuration

use super::*;
use crate::tables::MAX_PARAMETERS_COUNT;

#[test]
fn test_defaults() {
    let builder = MaterialBuilder::new();
    assert_eq!(builder.state(), BuilderState::Accumulating);
    assert_eq!(builder.get_platform(), Platform::Desktop);
    assert_eq!(builder.get_target_api(), TargetApi::OpenGl);
    assert_eq!(builder.get_codegen_target_api(), None);
    assert_eq!(builder.get_variant_filter(), 0);
    assert_eq!(builder.parameter_count(), 0);
    assert!(builder.is_lit());
    assert!(builder.failure_reason().is_none());
}

#[test]
fn test_build_transitions_to_built() {
    let mut builder = MaterialBuilder::new();
    builder.name("plain");
    let package = builder.build().unwrap();

    assert_eq!(builder.state(), BuilderState::Built);
    assert_eq!(package.name(), "plain");
    assert_eq!(builder.jobs(), package.jobs.as_slice());
    assert!(!package.is_empty());
}

#[test]
fn test_second_build_is_rejected() {
    let mut builder = MaterialBuilder::new();
    builder.build().unwrap();
    assert_eq!(
        builder.build().unwrap_err(),
        BuildError::AlreadyFinished(BuilderState::Built)
    );
    assert_eq!(builder.state(), BuilderState::Built);
}

#[test]
fn test_config_error_fails_builder() {
    let mut builder = MaterialBuilder::new();
    builder.codegen_target_api(TargetApi::All);

    let err = builder.build().unwrap_err();
    assert_eq!(err, BuildError::Config(ConfigError::InvalidCodeGenTarget));
    assert_eq!(builder.state(), BuilderState::Failed);
    assert_eq!(builder.failure_reason(), Some(&err));

    // Terminal: fixing the configuration does not revive the builder
    builder.codegen_target_api(TargetApi::OpenGl);
    assert_eq!(
        builder.build().unwrap_err(),
        BuildError::AlreadyFinished(BuilderState::Failed)
    );
}

#[test]
fn test_parameter_overflow_through_builder() {
    let mut builder = MaterialBuilder::new();
    for i in 0..MAX_PARAMETERS_COUNT {
        builder.parameter(format!("p{i}"), UniformType::Float).unwrap();
    }
    let err = builder
        .sampler("one_too_many", SamplerType::Sampler2d)
        .unwrap_err();
    assert!(matches!(err, ConfigError::ParameterCapacity { max: 32, .. }));
    assert_eq!(builder.parameter_count(), MAX_PARAMETERS_COUNT);

    // The rejected insert is reported again by the build
    assert!(matches!(
        builder.build(),
        Err(BuildError::Config(ConfigError::ParameterCapacity { .. }))
    ));
    assert_eq!(builder.state(), BuilderState::Failed);
}

#[test]
fn test_parameter_chaining() {
    let mut builder = MaterialBuilder::new();
    builder
        .parameter("tint", UniformType::Float4)
        .and_then(|b| b.parameter_array("weights", UniformType::Float, 4))
        .and_then(|b| {
            b.sampler_with_precision("albedo", SamplerType::Sampler2d, Precision::High)
        })
        .and_then(|b| b.sampler_with_format("depth", SamplerType::Sampler2d, SamplerFormat::Shadow))
        .and_then(|b| b.sampler("camera", SamplerType::SamplerExternal))
        .unwrap();

    assert_eq!(builder.parameter_count(), 5);
    assert!(builder.has_external_sampler());
    let names: Vec<&str> = builder.parameters().iter().map(Parameter::name).collect();
    assert_eq!(names, ["tint", "weights", "albedo", "depth", "camera"]);
}

#[test]
fn test_double_sided_wins_regardless_of_order() {
    let mut before = MaterialBuilder::new();
    before.double_sided(true).culling(CullingMode::Front);
    let mut after = MaterialBuilder::new();
    after.culling(CullingMode::Front).double_sided(true);

    for builder in [&mut before, &mut after] {
        let package = builder.build().unwrap();
        assert_eq!(package.header.culling, CullingMode::None);
        assert!(package.header.double_sided);
    }
}

#[test]
fn test_peek_leaves_state_untouched() {
    let mut builder = MaterialBuilder::new();
    builder.platform(Platform::All).target_api(TargetApi::All);

    let (text, model) = builder.peek(ShaderStage::Vertex).unwrap();
    assert_eq!(model, ShaderModel::GlEs30);
    assert!(text.starts_with("#version 300 es"));
    assert_eq!(builder.state(), BuilderState::Accumulating);
    assert!(builder.jobs().is_empty());
}

#[test]
fn test_peek_after_build() {
    let mut builder = MaterialBuilder::new();
    builder.build().unwrap();
    let (_, model) = builder.peek(ShaderStage::Fragment).unwrap();
    assert_eq!(model, ShaderModel::GlCore41);
}

#[test]
fn test_state_display() {
    assert_eq!(BuilderState::Accumulating.to_string(), "accumulating");
    assert_eq!(BuilderState::Failed.to_string(), "failed");
    assert!(BuilderState::Built.is_finished());
    assert!(!BuilderState::Prepared.is_finished());
}
