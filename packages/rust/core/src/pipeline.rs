//! Batch driver: table store → resolve → assemble → validate → output files.
//!
//! [`generate_all`] runs every category once and isolates failures per
//! category. [`build_category`] is the single-category entry point and never
//! touches disk.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use coursegraph_shared::{CourseGraphError, Document, GenerationConfig, Result};
use coursegraph_tables::TableStore;

use crate::assembler::Assembler;
use crate::breadcrumb::category_slug;
use crate::resolver::{OrphanReference, ResolveWarning, find_orphans, resolve_category};
use crate::validator::{ValidationWarning, validate};

/// Name of the run summary written next to the documents.
pub const INDEX_FILE: &str = "index.json";

/// Output settings for a batch run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory the documents and index are written to.
    pub output_dir: PathBuf,
    /// Appended to each category slug to form the file name.
    pub file_suffix: String,
    /// Tool name and version recorded in the index.
    pub generator: String,
}

impl GenerateConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_suffix: GenerationConfig::default().file_suffix,
            generator: format!("coursegraph {}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }
}

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each category, written or failed.
    fn category_done(&self, outcome: &CategoryOutcome, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, report: &BatchReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn category_done(&self, _outcome: &CategoryOutcome, _current: usize, _total: usize) {}
    fn done(&self, _report: &BatchReport) {}
}

/// One category's document, built in memory.
#[derive(Debug, Clone)]
pub struct CategoryBuild {
    pub document: Document,
    pub validation: Vec<ValidationWarning>,
    pub resolve_warnings: Vec<ResolveWarning>,
    /// File-name stem for this category.
    pub slug: String,
}

/// A document that reached disk.
#[derive(Debug, Clone)]
pub struct WrittenDocument {
    pub category_id: String,
    pub path: PathBuf,
    pub sha256: String,
    pub validation: Vec<ValidationWarning>,
    pub resolve_warnings: Vec<ResolveWarning>,
}

impl WrittenDocument {
    pub fn warning_count(&self) -> usize {
        self.validation.len() + self.resolve_warnings.len()
    }
}

/// Result of one category in a batch run.
#[derive(Debug)]
pub enum CategoryOutcome {
    Written(WrittenDocument),
    Failed {
        category_id: String,
        error: CourseGraphError,
    },
}

impl CategoryOutcome {
    pub fn category_id(&self) -> &str {
        match self {
            Self::Written(doc) => &doc.category_id,
            Self::Failed { category_id, .. } => category_id,
        }
    }
}

/// Everything a batch run produced.
#[derive(Debug)]
pub struct BatchReport {
    /// One outcome per distinct category id, in table order.
    pub outcomes: Vec<CategoryOutcome>,
    /// Child rows whose parent key matched nothing.
    pub orphans: Vec<OrphanReference>,
    /// Category ids that appeared again after their first row.
    pub duplicate_categories: Vec<String>,
    pub index_path: PathBuf,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn written(&self) -> impl Iterator<Item = &WrittenDocument> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CategoryOutcome::Written(doc) => Some(doc),
            CategoryOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CourseGraphError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CategoryOutcome::Failed { category_id, error } => Some((category_id.as_str(), error)),
            CategoryOutcome::Written(_) => None,
        })
    }

    /// Total validation warnings across written documents.
    pub fn validation_warning_count(&self) -> usize {
        self.written().map(|doc| doc.validation.len()).sum()
    }

    /// No failures and no validation warnings.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none() && self.validation_warning_count() == 0
    }
}

/// Build one category's document without writing anything.
#[instrument(skip(store, assembler))]
pub fn build_category(
    store: &TableStore,
    assembler: &Assembler,
    category_id: &str,
) -> Result<CategoryBuild> {
    let resolved = resolve_category(category_id, store)?;
    let document = assembler.assemble(&resolved, store.organization());

    let validation = validate(&document);
    for warning in &validation {
        warn!(category_id, %warning, "validation warning");
    }

    Ok(CategoryBuild {
        slug: category_slug(resolved.category),
        document,
        validation,
        resolve_warnings: resolved.warnings,
    })
}

/// Generate, validate and write a document for every category.
///
/// Only run-level problems (the output directory or index cannot be written)
/// return `Err`; per-category errors become [`CategoryOutcome::Failed`].
#[instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn generate_all(
    store: &TableStore,
    assembler: &Assembler,
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<BatchReport> {
    let start = Instant::now();

    progress.phase("Preparing output directory");
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| CourseGraphError::io(&config.output_dir, e))?;

    progress.phase("Checking references");
    let orphans = find_orphans(store);

    let mut seen = HashSet::new();
    let mut category_ids = Vec::new();
    let mut duplicate_categories = Vec::new();
    for page in store.category_pages() {
        if seen.insert(page.category_id.as_str()) {
            category_ids.push(page.category_id.as_str());
        } else {
            warn!(category_id = %page.category_id, "duplicate category row skipped");
            duplicate_categories.push(page.category_id.clone());
        }
    }

    progress.phase("Generating documents");
    let total = category_ids.len();
    let mut claimed: HashMap<String, String> = HashMap::new();
    claimed.insert(INDEX_FILE.to_string(), "index".to_string());

    let mut outcomes = Vec::with_capacity(total);
    for (i, category_id) in category_ids.into_iter().enumerate() {
        let outcome = match generate_one(store, assembler, config, category_id, &mut claimed) {
            Ok(doc) => CategoryOutcome::Written(doc),
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                warn!(category_id, %error, "category failed, continuing");
                CategoryOutcome::Failed {
                    category_id: category_id.to_string(),
                    error,
                }
            }
        };
        progress.category_done(&outcome, i + 1, total);
        outcomes.push(outcome);
    }

    progress.phase("Writing index");
    let index_path = config.output_dir.join(INDEX_FILE);
    let index = OutputIndex::new(config, &outcomes, &orphans);
    let index_json = serde_json::to_string_pretty(&index)? + "\n";
    write_atomic(&index_path, &index_json)?;

    let report = BatchReport {
        outcomes,
        orphans,
        duplicate_categories,
        index_path,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        written = report.written().count(),
        failed = report.failures().count(),
        orphans = report.orphans.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "generation complete"
    );

    Ok(report)
}

/// Build one category and write it, claiming its file name.
fn generate_one(
    store: &TableStore,
    assembler: &Assembler,
    config: &GenerateConfig,
    category_id: &str,
    claimed: &mut HashMap<String, String>,
) -> Result<WrittenDocument> {
    let build = build_category(store, assembler, category_id)?;

    let file_name = format!("{}{}", build.slug, config.file_suffix);
    let path = config.output_dir.join(&file_name);
    if let Some(owner) = claimed.get(&file_name) {
        return Err(CourseGraphError::OutputCollision {
            path,
            owner: owner.clone(),
        });
    }
    claimed.insert(file_name, category_id.to_string());

    let json = build.document.to_pretty_json()?;
    write_atomic(&path, &json)?;

    Ok(WrittenDocument {
        category_id: category_id.to_string(),
        sha256: sha256_hex(&json),
        path,
        validation: build.validation,
        resolve_warnings: build.resolve_warnings,
    })
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct OutputIndex {
    generator: String,
    documents: Vec<IndexDocument>,
    failures: Vec<IndexFailure>,
    orphans: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IndexDocument {
    category_id: String,
    file: String,
    sha256: String,
    warnings: usize,
}

#[derive(Debug, Serialize)]
struct IndexFailure {
    category_id: String,
    error: String,
}

impl OutputIndex {
    fn new(
        config: &GenerateConfig,
        outcomes: &[CategoryOutcome],
        orphans: &[OrphanReference],
    ) -> Self {
        let mut documents = Vec::new();
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome {
                CategoryOutcome::Written(doc) => documents.push(IndexDocument {
                    category_id: doc.category_id.clone(),
                    file: doc
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    sha256: doc.sha256.clone(),
                    warnings: doc.warning_count(),
                }),
                CategoryOutcome::Failed { category_id, error } => failures.push(IndexFailure {
                    category_id: category_id.clone(),
                    error: error.to_string(),
                }),
            }
        }

        Self {
            generator: config.generator.clone(),
            documents,
            failures,
            orphans: orphans.iter().map(ToString::to_string).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write to a hidden temp file beside `path`, then rename over it.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| CourseGraphError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| CourseGraphError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
