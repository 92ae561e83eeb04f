//! Application configuration for coursegraph.
//!
//! Config is read from `--config`, then `./coursegraph.toml`, then
//! `~/.coursegraph/coursegraph.toml`. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CourseGraphError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "coursegraph.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursegraph";

// ---------------------------------------------------------------------------
// Config structs (matching coursegraph.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// File names of the eight source tables.
    #[serde(default)]
    pub tables: TableFiles,

    /// Document generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the CSV exports.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Directory receiving generated documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "./schema_data".into()
}
fn default_output_dir() -> String {
    "./output".into()
}

/// `[tables]` section: one file name per source table, relative to `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFiles {
    #[serde(default = "default_organization_file")]
    pub organization: String,
    #[serde(default = "default_category_pages_file")]
    pub category_pages: String,
    #[serde(default = "default_category_topics_file")]
    pub category_topics: String,
    #[serde(default = "default_courses_file")]
    pub courses: String,
    #[serde(default = "default_course_topics_file")]
    pub course_topics: String,
    #[serde(default = "default_areas_served_file")]
    pub areas_served: String,
    #[serde(default = "default_category_tags_file")]
    pub category_tags: String,
    #[serde(default = "default_faqs_file")]
    pub faqs: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            organization: default_organization_file(),
            category_pages: default_category_pages_file(),
            category_topics: default_category_topics_file(),
            courses: default_courses_file(),
            course_topics: default_course_topics_file(),
            areas_served: default_areas_served_file(),
            category_tags: default_category_tags_file(),
            faqs: default_faqs_file(),
        }
    }
}

impl TableFiles {
    /// All eight file names in load order.
    pub fn all(&self) -> [&str; 8] {
        [
            &self.organization,
            &self.category_pages,
            &self.category_topics,
            &self.courses,
            &self.course_topics,
            &self.areas_served,
            &self.category_tags,
            &self.faqs,
        ]
    }
}

fn default_organization_file() -> String {
    "01_organization_variables.csv".into()
}
fn default_category_pages_file() -> String {
    "02_category_pages.csv".into()
}
fn default_category_topics_file() -> String {
    "03_category_about_topics.csv".into()
}
fn default_courses_file() -> String {
    "04_courses_master_list.csv".into()
}
fn default_course_topics_file() -> String {
    "05_course_topics.csv".into()
}
fn default_areas_served_file() -> String {
    "06_area_served.csv".into()
}
fn default_category_tags_file() -> String {
    "07_categories_tags.csv".into()
}
fn default_faqs_file() -> String {
    "08_faqs.csv".into()
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Suffix appended to the category slug to form the output file name.
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Currency applied to priced offers whose row has no currency.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Country applied to addresses that carry other address fields.
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Treat validation warnings and category failures as a failed run.
    #[serde(default)]
    pub strict: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            file_suffix: default_file_suffix(),
            default_currency: default_currency(),
            default_country: default_country(),
            strict: false,
        }
    }
}

fn default_file_suffix() -> String {
    "_schema.json".into()
}
fn default_currency() -> String {
    "USD".into()
}
fn default_country() -> String {
    "US".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.coursegraph/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CourseGraphError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.coursegraph/coursegraph.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config.
///
/// An explicit path must exist. Otherwise `./coursegraph.toml` is tried, then
/// the user config file, and defaults are returned when neither exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    let path = config_file_path()?;
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CourseGraphError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CourseGraphError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default config file into `dir`, creating the directory if needed.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| CourseGraphError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| CourseGraphError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CourseGraphError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
