//! Material package format and assembly
//!
//! This crate is shared between:
//! - `matforge-core` (build orchestration, which writes packages)
//! - runtimes and tools that load `.matpkg` files
//!
//! # Modules
//!
//! - [`package`] - The `.matpkg` container, its header and shader records
//! - [`assembler`] - The [`PackageSink`] seam and the default [`PackageAssembler`]

pub mod assembler;
pub mod package;

pub use assembler::{AssemblerError, PackageAssembler, PackageSink, ShaderArtifact};
pub use package::{MaterialHeader, MaterialPackage, ShaderKey, ShaderRecord};
