//! Core domain logic for coursegraph.
//!
//! This crate turns a loaded [`coursegraph_tables::TableStore`] into one
//! JSON-LD document per category page: resolve the related rows, assemble the
//! graph, validate it, and write it out (`generate_all`, `build_category`).

pub mod assembler;
pub mod breadcrumb;
pub mod pipeline;
pub mod resolver;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use assembler::{Assembler, AssemblerOptions, assemble};
pub use pipeline::{
    BatchReport, CategoryBuild, CategoryOutcome, GenerateConfig, ProgressReporter,
    SilentProgress, build_category, generate_all,
};
pub use resolver::{ResolvedCategory, find_orphans, resolve_category};
pub use validator::{Rule, ValidationWarning, validate};
