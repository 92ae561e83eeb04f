//! Relationship resolver.
//!
//! Joins the child tables onto one category page by foreign key. All matching
//! is exact string equality and every sequence keeps source row order.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, instrument, warn};

use coursegraph_shared::{
    AreaServed, CategoryPage, CategoryTag, CategoryTopic, Course, CourseGraphError, CourseTopic,
    Faq, Record, Result,
};
use coursegraph_tables::TableStore;

/// A category page with every related row, borrowed from the store.
#[derive(Debug, Clone)]
pub struct ResolvedCategory<'a> {
    pub category: &'a CategoryPage,
    pub topics: Vec<&'a CategoryTopic>,
    pub courses: Vec<ResolvedCourse<'a>>,
    pub areas: Vec<&'a AreaServed>,
    pub tags: Vec<&'a CategoryTag>,
    pub faqs: Vec<&'a Faq>,
    pub warnings: Vec<ResolveWarning>,
}

/// A course paired with its own topics.
#[derive(Debug, Clone)]
pub struct ResolvedCourse<'a> {
    pub course: &'a Course,
    pub topics: Vec<&'a CourseTopic>,
}

/// Non-fatal data problems found while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// A key that should be unique appears on more than one row; the first wins.
    DuplicateKey {
        table: &'static str,
        key: String,
        row: usize,
    },
    /// A row was skipped because a display field is blank.
    IncompleteRow {
        table: &'static str,
        row: usize,
        column: &'static str,
    },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { table, key, row } => {
                write!(f, "{table} row {row}: duplicate key '{key}' ignored")
            }
            Self::IncompleteRow { table, row, column } => {
                write!(f, "{table} row {row}: blank {column}, row skipped")
            }
        }
    }
}

/// A child row whose foreign key matches no parent row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanReference {
    pub table: &'static str,
    /// 1-based data row (the header is not counted).
    pub row: usize,
    pub column: &'static str,
    pub key: String,
    /// Identifier of the orphaned row itself, when the table has one.
    pub row_id: Option<String>,
}

impl fmt::Display for OrphanReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.row_id {
            Some(id) => write!(
                f,
                "{} row {} ('{id}'): {} '{}' matches no parent",
                self.table, self.row, self.column, self.key
            ),
            None => write!(
                f,
                "{} row {}: {} '{}' matches no parent",
                self.table, self.row, self.column, self.key
            ),
        }
    }
}

/// Resolve one category and everything attached to it.
#[instrument(skip(store))]
pub fn resolve_category<'a>(
    category_id: &str,
    store: &'a TableStore,
) -> Result<ResolvedCategory<'a>> {
    let mut warnings = Vec::new();

    let mut matches = store
        .category_pages()
        .iter()
        .enumerate()
        .filter(|(_, page)| page.category_id == category_id);

    let (_, category) = matches
        .next()
        .ok_or_else(|| CourseGraphError::category_not_found(category_id))?;

    for (index, _) in matches {
        warnings.push(ResolveWarning::DuplicateKey {
            table: CategoryPage::TABLE,
            key: category_id.to_string(),
            row: index + 1,
        });
    }

    let topics = store
        .category_topics()
        .iter()
        .filter(|t| t.category_id == category_id && !t.topic_name.trim().is_empty())
        .collect();

    let areas = store
        .areas_served()
        .iter()
        .filter(|a| a.category_id == category_id && !a.area_served_name.trim().is_empty())
        .collect();

    let tags = store
        .category_tags()
        .iter()
        .filter(|t| t.category_id == category_id && !t.tag.trim().is_empty())
        .collect();

    let mut faqs = Vec::new();
    for (index, faq) in store.faqs().iter().enumerate() {
        if faq.category_id != category_id {
            continue;
        }
        if faq.faq_question.trim().is_empty() {
            warnings.push(ResolveWarning::IncompleteRow {
                table: Faq::TABLE,
                row: index + 1,
                column: "faq_question",
            });
            continue;
        }
        faqs.push(faq);
    }

    let courses = resolve_courses(category_id, store, &mut warnings);

    for warning in &warnings {
        warn!(category_id, %warning, "resolve warning");
    }

    debug!(
        courses = courses.len(),
        faqs = faqs.len(),
        "category resolved"
    );

    Ok(ResolvedCategory {
        category,
        topics,
        courses,
        areas,
        tags,
        faqs,
        warnings,
    })
}

/// Courses of one category, first occurrence of each course id only.
fn resolve_courses<'a>(
    category_id: &str,
    store: &'a TableStore,
    warnings: &mut Vec<ResolveWarning>,
) -> Vec<ResolvedCourse<'a>> {
    let categories: HashSet<&str> = store
        .category_pages()
        .iter()
        .map(|p| p.category_id.as_str())
        .collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut courses = Vec::new();

    for (index, course) in store.courses().iter().enumerate() {
        // Ids are claimed table-wide so a duplicate in another category is
        // still dropped here. Orphan rows never claim an id.
        if !categories.contains(course.category_id.as_str()) {
            continue;
        }
        let first = seen.insert(course.course_id.as_str());
        if course.category_id != category_id {
            continue;
        }
        if !first {
            warnings.push(ResolveWarning::DuplicateKey {
                table: Course::TABLE,
                key: course.course_id.clone(),
                row: index + 1,
            });
            continue;
        }

        let topics = store
            .course_topics()
            .iter()
            .filter(|t| t.course_id == course.course_id && !t.topic.trim().is_empty())
            .collect();

        courses.push(ResolvedCourse { course, topics });
    }

    courses
}

/// Every child row in the store whose parent key matches nothing.
#[instrument(skip_all)]
pub fn find_orphans(store: &TableStore) -> Vec<OrphanReference> {
    let categories: HashSet<&str> = store
        .category_pages()
        .iter()
        .map(|p| p.category_id.as_str())
        .collect();
    let course_ids: HashSet<&str> = store.courses().iter().map(|c| c.course_id.as_str()).collect();

    let mut orphans = Vec::new();

    collect_orphans(
        &mut orphans,
        Course::TABLE,
        "category_id",
        &categories,
        store
            .courses()
            .iter()
            .map(|c| (c.category_id.as_str(), Some(c.course_id.as_str()))),
    );
    collect_orphans(
        &mut orphans,
        CategoryTopic::TABLE,
        "category_id",
        &categories,
        store
            .category_topics()
            .iter()
            .map(|t| (t.category_id.as_str(), None)),
    );
    collect_orphans(
        &mut orphans,
        CourseTopic::TABLE,
        "course_id",
        &course_ids,
        store
            .course_topics()
            .iter()
            .map(|t| (t.course_id.as_str(), None)),
    );
    collect_orphans(
        &mut orphans,
        AreaServed::TABLE,
        "category_id",
        &categories,
        store
            .areas_served()
            .iter()
            .map(|a| (a.category_id.as_str(), None)),
    );
    collect_orphans(
        &mut orphans,
        CategoryTag::TABLE,
        "category_id",
        &categories,
        store
            .category_tags()
            .iter()
            .map(|t| (t.category_id.as_str(), None)),
    );
    collect_orphans(
        &mut orphans,
        Faq::TABLE,
        "category_id",
        &categories,
        store.faqs().iter().map(|f| (f.category_id.as_str(), None)),
    );

    for orphan in &orphans {
        warn!(%orphan, "orphan reference dropped");
    }

    orphans
}

/// Append one orphan per `(foreign key, row id)` whose key is not in `parents`.
fn collect_orphans<'a>(
    orphans: &mut Vec<OrphanReference>,
    table: &'static str,
    column: &'static str,
    parents: &HashSet<&str>,
    rows: impl Iterator<Item = (&'a str, Option<&'a str>)>,
) {
    for (index, (key, row_id)) in rows.enumerate() {
        if !parents.contains(key) {
            orphans.push(OrphanReference {
                table,
                row: index + 1,
                column,
                key: key.to_string(),
                row_id: row_id.map(str::to_string),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{category, course, course_topic, faq, store_with, tag, topic};
    use coursegraph_tables::Tables;

    #[test]
    fn unknown_category_is_not_found() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            ..Default::default()
        });
        let err = resolve_category("boating", &store).unwrap_err();
        assert!(matches!(
            err,
            CourseGraphError::CategoryNotFound { ref category_id } if category_id == "boating"
        ));
    }

    #[test]
    fn ids_match_case_sensitively() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            ..Default::default()
        });
        assert!(resolve_category("Drivers-Ed", &store).is_err());
    }

    #[test]
    fn course_topics_keep_source_order() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            courses: vec![course("DE101", "drivers-ed", "Teen Driver's Ed")],
            course_topics: vec![
                course_topic("DE101", "Parallel parking"),
                course_topic("XX999", "Unrelated"),
                course_topic("DE101", "Right of way"),
                course_topic("DE101", "Night driving"),
            ],
            ..Default::default()
        });

        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let topics: Vec<&str> = resolved.courses[0]
            .topics
            .iter()
            .map(|t| t.topic.as_str())
            .collect();
        assert_eq!(topics, ["Parallel parking", "Right of way", "Night driving"]);
    }

    #[test]
    fn duplicate_category_takes_first_and_warns() {
        let store = store_with(Tables {
            category_pages: vec![
                category("drivers-ed", "First"),
                category("drivers-ed", "Second"),
            ],
            ..Default::default()
        });

        let resolved = resolve_category("drivers-ed", &store).unwrap();
        assert_eq!(resolved.category.category_page_name, "First");
        assert_eq!(
            resolved.warnings,
            vec![ResolveWarning::DuplicateKey {
                table: "category_pages",
                key: "drivers-ed".into(),
                row: 2,
            }]
        );
    }

    #[test]
    fn duplicate_course_id_keeps_first_row() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            courses: vec![
                course("DE101", "drivers-ed", "Original"),
                course("DE102", "drivers-ed", "Other"),
                course("DE101", "drivers-ed", "Copy"),
            ],
            ..Default::default()
        });

        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let names: Vec<&str> = resolved
            .courses
            .iter()
            .map(|c| c.course.course_name.as_str())
            .collect();
        assert_eq!(names, ["Original", "Other"]);
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn blank_faq_question_is_skipped_with_warning() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            faqs: vec![
                faq("drivers-ed", "", "Orphaned answer"),
                faq("drivers-ed", "How long?", "30 hours."),
            ],
            ..Default::default()
        });

        let resolved = resolve_category("drivers-ed", &store).unwrap();
        assert_eq!(resolved.faqs.len(), 1);
        assert!(matches!(
            resolved.warnings[0],
            ResolveWarning::IncompleteRow { row: 1, .. }
        ));
    }

    #[test]
    fn orphan_course_is_reported_by_id() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            courses: vec![
                course("DE101", "drivers-ed", "Teen Driver's Ed"),
                course("ZZ900", "nonexistent-cat", "Lost Course"),
            ],
            course_topics: vec![course_topic("NOPE", "Dangling")],
            ..Default::default()
        });

        let orphans = find_orphans(&store);
        assert_eq!(orphans.len(), 2);
        assert_eq!(orphans[0].table, "courses");
        assert_eq!(orphans[0].row_id.as_deref(), Some("ZZ900"));
        assert!(orphans[0].to_string().contains("ZZ900"));
        assert_eq!(orphans[1].table, "course_topics");
        assert_eq!(orphans[1].key, "NOPE");

        let resolved = resolve_category("drivers-ed", &store).unwrap();
        assert!(resolved.courses.iter().all(|c| c.course.course_id != "ZZ900"));
    }

    #[test]
    fn orphan_row_does_not_claim_course_id() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            courses: vec![
                course("DE101", "nonexistent-cat", "Lost Course"),
                course("DE101", "drivers-ed", "Teen Driver's Ed"),
            ],
            ..Default::default()
        });

        let resolved = resolve_category("drivers-ed", &store).unwrap();
        assert_eq!(resolved.courses.len(), 1);
        assert_eq!(resolved.courses[0].course.course_name, "Teen Driver's Ed");
        assert!(resolved.warnings.is_empty(), "{:?}", resolved.warnings);
    }

    #[test]
    fn interleaved_rows_keep_source_order() {
        let store = store_with(Tables {
            category_pages: vec![
                category("drivers-ed", "Driver's Ed"),
                category("defensive-driving", "Defensive Driving"),
            ],
            category_topics: vec![
                topic("drivers-ed", "Road rules"),
                topic("defensive-driving", "Hazards"),
                topic("drivers-ed", "Permits"),
                topic("defensive-driving", "Ticket dismissal"),
                topic("drivers-ed", "Road test"),
            ],
            category_tags: vec![
                tag("defensive-driving", "insurance"),
                tag("drivers-ed", "teen"),
                tag("defensive-driving", "ticket"),
                tag("drivers-ed", "permit"),
            ],
            faqs: vec![
                faq("drivers-ed", "How long?", "30 hours."),
                faq("defensive-driving", "Is it online?", "Yes."),
                faq("drivers-ed", "What age?", "14 and up."),
                faq("defensive-driving", "Court approved?", "Yes."),
                faq("drivers-ed", "Is there a test?", "Yes."),
            ],
            ..Default::default()
        });

        let drivers_ed = resolve_category("drivers-ed", &store).unwrap();
        let topics: Vec<&str> = drivers_ed
            .topics
            .iter()
            .map(|t| t.topic_name.as_str())
            .collect();
        assert_eq!(topics, ["Road rules", "Permits", "Road test"]);
        let tags: Vec<&str> = drivers_ed.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["teen", "permit"]);
        let questions: Vec<&str> = drivers_ed
            .faqs
            .iter()
            .map(|f| f.faq_question.as_str())
            .collect();
        assert_eq!(questions, ["How long?", "What age?", "Is there a test?"]);

        let defensive = resolve_category("defensive-driving", &store).unwrap();
        let topics: Vec<&str> = defensive
            .topics
            .iter()
            .map(|t| t.topic_name.as_str())
            .collect();
        assert_eq!(topics, ["Hazards", "Ticket dismissal"]);
        let tags: Vec<&str> = defensive.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["insurance", "ticket"]);
        let questions: Vec<&str> = defensive
            .faqs
            .iter()
            .map(|f| f.faq_question.as_str())
            .collect();
        assert_eq!(questions, ["Is it online?", "Court approved?"]);
    }
}
