//! Build orchestration.
//!
//! A build is a matrix of units: every resolved job, times every generated variant,
//! times every stage the variant owns. Units are independent, so they run on rayon's
//! pool when parallel building is enabled; results are collected in unit order, which
//! is the canonical package order (job, then variant, then stage).
//!
//! Unit failures never stop other units. Any failure means no package is assembled.

use matforge_package::{AssemblerError, MaterialHeader, PackageSink, ShaderArtifact};
use matforge_shared::{CodeGenJob, ShaderStage, Variant};
use rayon::prelude::*;

use crate::descriptor::MaterialDescriptor;
use crate::error::{BuildError, UnitError, UnitErrorKind};
use crate::generator::ShaderGenerator;
use crate::post_process::{PostProcessInput, PostProcessor};
use crate::variant_filter::stages_for;

/// One (job, variant, stage) generation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildUnit {
    pub job: CodeGenJob,
    pub variant: Variant,
    pub stage: ShaderStage,
}

/// Units of a build, in canonical order
pub fn plan_units(jobs: &[CodeGenJob], variants: &[Variant]) -> Vec<BuildUnit> {
    let mut units = Vec::new();
    for job in jobs {
        for &variant in variants {
            for stage in stages_for(variant) {
                units.push(BuildUnit {
                    job: *job,
                    variant,
                    stage,
                });
            }
        }
    }
    units
}

/// Capabilities and inputs shared by every unit of one build
pub struct Orchestrator<'a> {
    pub descriptor: &'a MaterialDescriptor,
    pub generator: &'a dyn ShaderGenerator,
    pub post_processor: Option<&'a dyn PostProcessor>,
    pub parallel: bool,
}

impl Orchestrator<'_> {
    /// Run a single unit: generate, then post-process if a hook is configured.
    pub fn run_unit(&self, unit: &BuildUnit) -> Result<ShaderArtifact, UnitError> {
        let unit_error = |kind| UnitError {
            job: unit.job,
            variant: unit.variant.key(),
            stage: unit.stage,
            kind,
        };

        let text = self
            .generator
            .generate(self.descriptor, &unit.job, unit.variant, unit.stage)
            .map_err(|e| unit_error(UnitErrorKind::Generation(e.to_string())))?;

        let (text, binary) = match self.post_processor {
            Some(post_processor) => {
                let input = PostProcessInput {
                    text: &text,
                    stage: unit.stage,
                    shader_model: unit.job.shader_model,
                    job: &unit.job,
                    variant: unit.variant,
                };
                let output = post_processor
                    .process(&input)
                    .map_err(|e| unit_error(UnitErrorKind::PostProcess(e.to_string())))?;
                if output.text.is_none() && output.binary.is_none() {
                    return Err(unit_error(UnitErrorKind::PostProcess(
                        "post-processor produced neither text nor binary".to_string(),
                    )));
                }
                (output.text, output.binary)
            }
            None => (Some(text), None),
        };

        tracing::debug!(
            job = %unit.job,
            variant = unit.variant.key(),
            stage = %unit.stage,
            "generated shader"
        );
        Ok(ShaderArtifact {
            job: unit.job,
            variant: unit.variant,
            stage: unit.stage,
            text,
            binary,
        })
    }

    /// Run every unit, returning results in unit order.
    pub fn run_units(&self, units: &[BuildUnit]) -> Vec<Result<ShaderArtifact, UnitError>> {
        if self.parallel {
            units.par_iter().map(|unit| self.run_unit(unit)).collect()
        } else {
            units.iter().map(|unit| self.run_unit(unit)).collect()
        }
    }

    /// Run every unit and hand the artifacts to `sink`.
    ///
    /// Every unit runs even when some fail; failures are returned together and the
    /// sink is never started in that case.
    pub fn execute<S: PackageSink>(
        &self,
        units: &[BuildUnit],
        header: MaterialHeader,
        jobs: &[CodeGenJob],
        sink: S,
    ) -> Result<S::Output, BuildError> {
        let mut artifacts = Vec::with_capacity(units.len());
        let mut failures = Vec::new();
        for result in self.run_units(units) {
            match result {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    tracing::warn!(
                        job = %e.job,
                        variant = e.variant,
                        stage = %e.stage,
                        reason = %e.kind,
                        "shader unit failed"
                    );
                    failures.push(e);
                }
            }
        }
        if !failures.is_empty() {
            return Err(BuildError::Units(failures));
        }

        Ok(assemble(sink, header, jobs, artifacts)?)
    }
}

/// Submit artifacts to a sink in order and finish it.
pub fn assemble<S: PackageSink>(
    mut sink: S,
    header: MaterialHeader,
    jobs: &[CodeGenJob],
    artifacts: Vec<ShaderArtifact>,
) -> Result<S::Output, AssemblerError> {
    sink.begin(header, jobs)?;
    for artifact in artifacts {
        sink.submit(artifact)?;
    }
    sink.finish()
}
