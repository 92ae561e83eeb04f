//! Shared types, error model, and configuration for coursegraph.
//!
//! This crate is the foundation depended on by all other coursegraph crates.
//! It provides:
//! - [`CourseGraphError`], the unified error type
//! - Source row records ([`CategoryPage`], [`Course`], [`Faq`], ...)
//! - The JSON-LD document model ([`Document`], [`Node`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod jsonld;
pub mod records;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, GenerationConfig, PathsConfig, TableFiles, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{CourseGraphError, Result};
pub use jsonld::{Document, IdRef, Node, SCHEMA_CONTEXT};
pub use records::{
    AreaServed, CategoryPage, CategoryTag, CategoryTopic, Course, CourseTopic, Faq,
    OrganizationVariables, Record, non_blank,
};
