//! Error types for coursegraph.
//!
//! Library crates use [`CourseGraphError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all coursegraph operations.
#[derive(Debug, thiserror::Error)]
pub enum CourseGraphError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A source table is missing, unreadable, malformed, or empty when it must not be.
    #[error("failed to load table '{table}': {message}")]
    DataLoad { table: String, message: String },

    /// A required column is absent from a table header.
    #[error("table '{table}' is missing required column '{column}'")]
    SchemaColumn { table: String, column: String },

    /// No category page row matches the requested identifier.
    #[error("category '{category_id}' not found in category pages")]
    CategoryNotFound { category_id: String },

    /// Two categories resolve to the same output file.
    #[error("output file {path:?} already written by category '{owner}'")]
    OutputCollision { path: PathBuf, owner: String },

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CourseGraphError>;

impl CourseGraphError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a data load error for the given table.
    pub fn data_load(table: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::DataLoad {
            table: table.into(),
            message: msg.into(),
        }
    }

    /// Create a missing-column error for the given table.
    pub fn schema_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::SchemaColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a category-not-found error.
    pub fn category_not_found(category_id: impl Into<String>) -> Self {
        Self::CategoryNotFound {
            category_id: category_id.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts a whole run rather than a single category.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::DataLoad { .. } | Self::SchemaColumn { .. }
        )
    }
}

impl From<serde_json::Error> for CourseGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CourseGraphError::schema_column("courses", "course_url");
        assert_eq!(
            err.to_string(),
            "table 'courses' is missing required column 'course_url'"
        );

        let err = CourseGraphError::category_not_found("drivers-ed");
        assert!(err.to_string().contains("'drivers-ed'"));
    }

    #[test]
    fn fatal_classification() {
        assert!(CourseGraphError::data_load("faqs", "file not found").is_fatal());
        assert!(CourseGraphError::schema_column("faqs", "faq_answer").is_fatal());
        assert!(!CourseGraphError::category_not_found("x").is_fatal());
    }
}
