//! Structural checks on assembled documents.
//!
//! Validation is advisory: [`validate`] never fails and returns every problem
//! it finds as a [`ValidationWarning`]. Callers decide whether a warning
//! blocks anything.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use coursegraph_shared::{Document, IdRef, Node, SCHEMA_CONTEXT};

/// Which check produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `@context` is not schema.org.
    Context,
    /// A required node type is missing, a node type is empty, or a node
    /// has an unrecognized `@type`.
    RequiredType,
    /// Nodes are out of order or a singleton type repeats.
    GraphOrder,
    /// A Course lacks a name, a usable URL or a valid duration.
    CourseField,
    /// A date-valued field is not a `YYYY-MM-DD` calendar date.
    DateFormat,
    /// Catalog counts disagree with the Course nodes.
    CatalogCount,
    /// An `@id` reference points at no node in the graph.
    DanglingReference,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Context => "context",
            Self::RequiredType => "required-type",
            Self::GraphOrder => "graph-order",
            Self::CourseField => "course-field",
            Self::DateFormat => "date-format",
            Self::CatalogCount => "catalog-count",
            Self::DanglingReference => "dangling-reference",
        };
        f.write_str(name)
    }
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub rule: Rule,
    pub message: String,
}

impl ValidationWarning {
    fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

/// Check a document and return every warning, in rule order.
#[instrument(skip_all, fields(nodes = document.graph.len()))]
pub fn validate(document: &Document) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    check_context(document, &mut warnings);
    check_required_types(document, &mut warnings);
    check_graph_order(document, &mut warnings);
    check_courses(document, &mut warnings);
    check_dates(document, &mut warnings);
    check_catalog_count(document, &mut warnings);
    check_references(document, &mut warnings);

    debug!(warnings = warnings.len(), "document validated");
    warnings
}

fn check_context(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    if document.context != SCHEMA_CONTEXT {
        warnings.push(ValidationWarning::new(
            Rule::Context,
            format!(
                "@context is '{}', expected '{SCHEMA_CONTEXT}'",
                document.context
            ),
        ));
    }
}

fn check_required_types(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    let present: HashSet<&str> = document.graph.iter().map(Node::type_name).collect();

    for required in [
        "WebSite",
        "EducationalOrganization",
        "CollectionPage",
        "OfferCatalog",
    ] {
        if !present.contains(required) {
            warnings.push(ValidationWarning::new(
                Rule::RequiredType,
                format!("missing {required} node"),
            ));
        }
    }

    let declares_faq = document
        .collection_page()
        .is_some_and(|page| page.has_part.is_some());
    match document.faq_page() {
        None if declares_faq => warnings.push(ValidationWarning::new(
            Rule::RequiredType,
            "CollectionPage declares FAQs but there is no FAQPage node",
        )),
        Some(faq) if faq.main_entity.is_empty() => warnings.push(ValidationWarning::new(
            Rule::RequiredType,
            "FAQPage has no questions",
        )),
        _ => {}
    }

    for (index, node) in document.graph.iter().enumerate() {
        if matches!(node, Node::Unknown) {
            warnings.push(ValidationWarning::new(
                Rule::RequiredType,
                format!("node at position {} has an unrecognized @type", index + 1),
            ));
        }
    }
}

/// Position of a node type in the fixed graph order.
fn rank(node: &Node) -> Option<u8> {
    match node {
        Node::WebSite(_) => Some(0),
        Node::EducationalOrganization(_) => Some(1),
        Node::CollectionPage(_) => Some(2),
        Node::OfferCatalog(_) => Some(3),
        Node::FaqPage(_) => Some(4),
        Node::Course(_) => Some(5),
        Node::Unknown => None,
    }
}

fn check_graph_order(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    let mut seen = HashSet::new();
    let mut highest = 0;

    for (index, node) in document.graph.iter().enumerate() {
        let Some(node_rank) = rank(node) else {
            continue;
        };
        if node_rank < highest {
            warnings.push(ValidationWarning::new(
                Rule::GraphOrder,
                format!("{} at position {} is out of order", node.type_name(), index + 1),
            ));
        }
        highest = highest.max(node_rank);

        if !matches!(node, Node::Course(_)) && !seen.insert(node.type_name()) {
            warnings.push(ValidationWarning::new(
                Rule::GraphOrder,
                format!("{} appears more than once", node.type_name()),
            ));
        }
    }
}

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:\d+Y)?(?:\d+M)?(?:\d+W)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:\.\d+)?S)?)?$")
        .expect("valid regex")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// ISO 8601 duration shape: `P` followed by at least one component.
pub fn is_iso8601_duration(value: &str) -> bool {
    DURATION_RE.is_match(value) && value != "P" && !value.ends_with('T')
}

/// `YYYY-MM-DD` that is also a real calendar date.
pub fn is_calendar_date(value: &str) -> bool {
    DATE_RE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn check_courses(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    for (index, course) in document.courses().enumerate() {
        let label = if course.name.trim().is_empty() {
            format!("Course #{}", index + 1)
        } else {
            format!("Course '{}'", course.name)
        };

        if course.name.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                Rule::CourseField,
                format!("{label} has an empty name"),
            ));
        }

        if course.url.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                Rule::CourseField,
                format!("{label} has no url"),
            ));
        } else if let Err(e) = Url::parse(&course.url) {
            warnings.push(ValidationWarning::new(
                Rule::CourseField,
                format!("{label} url '{}' is not absolute: {e}", course.url),
            ));
        }

        match course.time_required.as_deref() {
            None => warnings.push(ValidationWarning::new(
                Rule::CourseField,
                format!("{label} has no timeRequired"),
            )),
            Some(duration) if !is_iso8601_duration(duration) => {
                warnings.push(ValidationWarning::new(
                    Rule::CourseField,
                    format!("{label} timeRequired '{duration}' is not an ISO 8601 duration"),
                ));
            }
            Some(_) => {}
        }
    }
}

fn check_dates(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    let mut dates: Vec<(String, &str)> = Vec::new();

    for node in &document.graph {
        match node {
            Node::EducationalOrganization(org) => {
                if let Some(date) = org.founding_date.as_deref() {
                    dates.push(("EducationalOrganization foundingDate".into(), date));
                }
            }
            Node::CollectionPage(page) => {
                if let Some(date) = page.date_modified.as_deref() {
                    dates.push(("CollectionPage dateModified".into(), date));
                }
            }
            Node::Course(course) => {
                if let Some(date) = course.offers.availability_starts.as_deref() {
                    dates.push((format!("Course '{}' availabilityStarts", course.name), date));
                }
                if let Some(date) = course.offers.valid_from.as_deref() {
                    dates.push((format!("Course '{}' validFrom", course.name), date));
                }
            }
            _ => {}
        }
    }

    for (field, value) in dates {
        if !is_calendar_date(value) {
            warnings.push(ValidationWarning::new(
                Rule::DateFormat,
                format!("{field} '{value}' is not a YYYY-MM-DD date"),
            ));
        }
    }
}

fn check_catalog_count(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    let Some(catalog) = document.offer_catalog() else {
        return;
    };
    let courses = document.courses().count();

    if catalog.number_of_items != courses {
        warnings.push(ValidationWarning::new(
            Rule::CatalogCount,
            format!(
                "OfferCatalog numberOfItems is {}, graph has {courses} Course nodes",
                catalog.number_of_items
            ),
        ));
    }
    if catalog.item_list_element.len() != courses {
        warnings.push(ValidationWarning::new(
            Rule::CatalogCount,
            format!(
                "OfferCatalog lists {} offers, graph has {courses} Course nodes",
                catalog.item_list_element.len()
            ),
        ));
    }
}

fn check_references(document: &Document, warnings: &mut Vec<ValidationWarning>) {
    let ids: HashSet<&str> = document
        .graph
        .iter()
        .map(Node::id)
        .filter(|id| !id.is_empty())
        .collect();
    let mut references: Vec<(&'static str, &IdRef)> = Vec::new();

    for node in &document.graph {
        match node {
            Node::WebSite(site) => references.push(("WebSite publisher", &site.publisher)),
            Node::CollectionPage(page) => {
                references.push(("CollectionPage isPartOf", &page.is_part_of));
                references.push(("CollectionPage mainEntity", &page.main_entity));
                if let Some(part) = &page.has_part {
                    references.push(("CollectionPage hasPart", part));
                }
            }
            Node::OfferCatalog(catalog) => {
                references.push(("OfferCatalog provider", &catalog.provider));
                references.extend(
                    catalog
                        .item_list_element
                        .iter()
                        .map(|offer| ("OfferCatalog itemOffered", &offer.item_offered)),
                );
            }
            Node::Course(course) => {
                references.push(("Course provider", &course.provider));
                references.push(("Course isPartOf", &course.is_part_of));
            }
            Node::EducationalOrganization(_) | Node::FaqPage(_) | Node::Unknown => {}
        }
    }

    for (field, reference) in references {
        if !ids.contains(reference.id.as_str()) {
            warnings.push(ValidationWarning::new(
                Rule::DanglingReference,
                format!("{field} points at missing node '{}'", reference.id),
            ));
        }
    }
}
