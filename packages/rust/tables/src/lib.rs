//! Table Store: the eight source tables, loaded once and read-only.
//!
//! [`TableStore::load`] reads every table from a data directory and fails fast
//! if any file is missing, unreadable, or lacks a required column. The store is
//! then handed by reference to the resolver, assembler, and batch driver.

mod loader;

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use coursegraph_shared::{
    AreaServed, CategoryPage, CategoryTag, CategoryTopic, Course, CourseGraphError, CourseTopic,
    Faq, OrganizationVariables, Record, Result, TableFiles,
};

pub use loader::{parse_table, read_table};

/// The seven multi-row tables.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub category_pages: Vec<CategoryPage>,
    pub category_topics: Vec<CategoryTopic>,
    pub courses: Vec<Course>,
    pub course_topics: Vec<CourseTopic>,
    pub areas_served: Vec<AreaServed>,
    pub category_tags: Vec<CategoryTag>,
    pub faqs: Vec<Faq>,
}

/// All source data for one generation run.
#[derive(Debug, Clone)]
pub struct TableStore {
    organization: OrganizationVariables,
    tables: Tables,
}

impl TableStore {
    /// Load all eight tables from `data_dir`.
    #[instrument(skip_all, fields(data_dir = %data_dir.display()))]
    pub fn load(data_dir: &Path, files: &TableFiles) -> Result<Self> {
        if let Some(missing) = missing_files(data_dir, files).into_iter().next() {
            return Err(CourseGraphError::data_load(
                missing.file_name().map_or_else(
                    || missing.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                ),
                format!("file not found: {}", missing.display()),
            ));
        }

        let organization_rows: Vec<OrganizationVariables> =
            read_table(&data_dir.join(&files.organization))?;
        let organization = single_row(organization_rows)?;

        let tables = Tables {
            category_pages: read_table(&data_dir.join(&files.category_pages))?,
            category_topics: read_table(&data_dir.join(&files.category_topics))?,
            courses: read_table(&data_dir.join(&files.courses))?,
            course_topics: read_table(&data_dir.join(&files.course_topics))?,
            areas_served: read_table(&data_dir.join(&files.areas_served))?,
            category_tags: read_table(&data_dir.join(&files.category_tags))?,
            faqs: read_table(&data_dir.join(&files.faqs))?,
        };

        let store = Self::from_tables(organization, tables);
        info!(
            categories = store.tables.category_pages.len(),
            courses = store.tables.courses.len(),
            faqs = store.tables.faqs.len(),
            "all tables loaded"
        );
        Ok(store)
    }

    /// Build a store from rows already in memory.
    pub fn from_tables(organization: OrganizationVariables, tables: Tables) -> Self {
        Self {
            organization,
            tables,
        }
    }

    pub fn organization(&self) -> &OrganizationVariables {
        &self.organization
    }

    pub fn category_pages(&self) -> &[CategoryPage] {
        &self.tables.category_pages
    }

    pub fn category_topics(&self) -> &[CategoryTopic] {
        &self.tables.category_topics
    }

    pub fn courses(&self) -> &[Course] {
        &self.tables.courses
    }

    pub fn course_topics(&self) -> &[CourseTopic] {
        &self.tables.course_topics
    }

    pub fn areas_served(&self) -> &[AreaServed] {
        &self.tables.areas_served
    }

    pub fn category_tags(&self) -> &[CategoryTag] {
        &self.tables.category_tags
    }

    pub fn faqs(&self) -> &[Faq] {
        &self.tables.faqs
    }

    /// Row counts per table, in load order.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        vec![
            (OrganizationVariables::TABLE, 1),
            (CategoryPage::TABLE, self.tables.category_pages.len()),
            (CategoryTopic::TABLE, self.tables.category_topics.len()),
            (Course::TABLE, self.tables.courses.len()),
            (CourseTopic::TABLE, self.tables.course_topics.len()),
            (AreaServed::TABLE, self.tables.areas_served.len()),
            (CategoryTag::TABLE, self.tables.category_tags.len()),
            (Faq::TABLE, self.tables.faqs.len()),
        ]
    }
}

/// Paths of the configured table files that do not exist under `data_dir`.
pub fn missing_files(data_dir: &Path, files: &TableFiles) -> Vec<PathBuf> {
    files
        .all()
        .iter()
        .map(|name| data_dir.join(name))
        .filter(|path| !path.is_file())
        .collect()
}

/// Take the organization row; zero rows is fatal, extra rows are ignored.
fn single_row(rows: Vec<OrganizationVariables>) -> Result<OrganizationVariables> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    let first = rows.next().ok_or_else(|| {
        CourseGraphError::data_load(OrganizationVariables::TABLE, "table has no rows")
    })?;

    if count > 1 {
        warn!(
            table = OrganizationVariables::TABLE,
            rows = count,
            "expected a single row, using the first"
        );
    }
    Ok(first)
}
