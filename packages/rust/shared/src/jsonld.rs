//! JSON-LD document model for category pages.
//!
//! A [`Document`] is a single `@context` plus an ordered `@graph` of typed
//! [`Node`]s. Nested values that are not graph nodes (offers, addresses,
//! breadcrumb items, questions) carry their own `@type` string.

use serde::{Deserialize, Serialize};

/// The JSON-LD context shared by every document.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One structured-data document for one category page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@context", default)]
    pub context: String,
    #[serde(rename = "@graph", default)]
    pub graph: Vec<Node>,
}

impl Document {
    /// Create an empty document with the schema.org context.
    pub fn new() -> Self {
        Self {
            context: SCHEMA_CONTEXT.to_string(),
            graph: Vec::new(),
        }
    }

    /// Iterate over the Course nodes in graph order.
    pub fn courses(&self) -> impl Iterator<Item = &CourseNode> {
        self.graph.iter().filter_map(|node| match node {
            Node::Course(course) => Some(course),
            _ => None,
        })
    }

    /// The first OfferCatalog node, if any.
    pub fn offer_catalog(&self) -> Option<&OfferCatalogNode> {
        self.graph.iter().find_map(|node| match node {
            Node::OfferCatalog(catalog) => Some(catalog),
            _ => None,
        })
    }

    /// The first CollectionPage node, if any.
    pub fn collection_page(&self) -> Option<&CollectionPageNode> {
        self.graph.iter().find_map(|node| match node {
            Node::CollectionPage(page) => Some(page),
            _ => None,
        })
    }

    /// The first FAQPage node, if any.
    pub fn faq_page(&self) -> Option<&FaqPageNode> {
        self.graph.iter().find_map(|node| match node {
            Node::FaqPage(page) => Some(page),
            _ => None,
        })
    }

    /// Serialize as pretty-printed JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A reference to another node by `@id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    #[serde(rename = "@id")]
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ---------------------------------------------------------------------------
// Graph nodes
// ---------------------------------------------------------------------------

/// A top-level graph node, discriminated by `@type`.
///
/// Documents read back from disk may carry types this model does not know;
/// those parse as [`Node::Unknown`] and are never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Node {
    WebSite(WebSiteNode),
    EducationalOrganization(OrganizationNode),
    CollectionPage(CollectionPageNode),
    OfferCatalog(OfferCatalogNode),
    #[serde(rename = "FAQPage")]
    FaqPage(FaqPageNode),
    Course(CourseNode),
    #[serde(other, skip_serializing)]
    Unknown,
}

impl Node {
    /// The `@type` value this node serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::WebSite(_) => "WebSite",
            Self::EducationalOrganization(_) => "EducationalOrganization",
            Self::CollectionPage(_) => "CollectionPage",
            Self::OfferCatalog(_) => "OfferCatalog",
            Self::FaqPage(_) => "FAQPage",
            Self::Course(_) => "Course",
            Self::Unknown => "Unknown",
        }
    }

    /// The node's own `@id`, empty for unknown nodes.
    pub fn id(&self) -> &str {
        match self {
            Self::WebSite(n) => &n.id,
            Self::EducationalOrganization(n) => &n.id,
            Self::CollectionPage(n) => &n.id,
            Self::OfferCatalog(n) => &n.id,
            Self::FaqPage(n) => &n.id,
            Self::Course(n) => &n.id,
            Self::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSiteNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_language: Option<String>,
    pub publisher: IdRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founding_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPageNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub about: Vec<Thing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub is_part_of: IdRef,
    pub breadcrumb: BreadcrumbList,
    pub main_entity: IdRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_part: Option<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCatalogNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub number_of_items: usize,
    pub provider: IdRef,
    pub item_list_element: Vec<CatalogOffer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub area_served: Vec<Place>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPageNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseNode {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "abstract",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_prerequisites: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_credential_awarded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupational_credential_awarded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teaches: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_course_instance: Option<CourseInstance>,
    #[serde(default)]
    pub offers: Offer,
    #[serde(default)]
    pub provider: IdRef,
    #[serde(default)]
    pub is_part_of: IdRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_created: Option<Place>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactivity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_age_range: Option<String>,
}

// ---------------------------------------------------------------------------
// Embedded values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
}

impl PostalAddress {
    pub fn new() -> Self {
        Self {
            kind: "PostalAddress".into(),
            street_address: None,
            address_locality: None,
            address_region: None,
            postal_code: None,
            address_country: None,
        }
    }

    /// Whether any field other than the country is set.
    pub fn has_local_part(&self) -> bool {
        self.street_address.is_some()
            || self.address_locality.is_some()
            || self.address_region.is_some()
            || self.postal_code.is_some()
    }
}

impl Default for PostalAddress {
    fn default() -> Self {
        Self::new()
    }
}

/// A typed, named entity: `about` topics, instructors, geographic areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@type")]
    pub kind: String,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: String,
    pub position: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// One catalog entry pointing at a Course node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOffer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub position: usize,
    pub item_offered: IdRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A served region (`areaServed` entries). `@type` comes from the source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_area: Option<Thing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInstance {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub course_mode: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_workload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_schedule: Option<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Thing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(rename = "@type")]
    pub kind: String,
    pub schedule_timezone: String,
}

/// The offer embedded in a Course node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "@type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_starts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_region: Option<Place>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn website() -> Node {
        Node::WebSite(WebSiteNode {
            id: "https://acme.example/#website".into(),
            name: "Acme".into(),
            url: "https://acme.example".into(),
            description: None,
            in_language: None,
            publisher: IdRef::new("https://acme.example/#organization"),
        })
    }

    #[test]
    fn type_tag_serialized_first() {
        let json = serde_json::to_string(&website()).expect("serialize");
        assert!(json.starts_with(r#"{"@type":"WebSite","@id":"https://acme.example/#website""#));
        assert!(!json.contains("description"));
    }

    #[test]
    fn faq_page_uses_schema_org_spelling() {
        let node = Node::FaqPage(FaqPageNode {
            id: "#faq".into(),
            main_entity: vec![],
        });
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(value["@type"], "FAQPage");
        assert_eq!(node.type_name(), "FAQPage");
    }

    #[test]
    fn document_reads_back_from_json() {
        let mut doc = Document::new();
        doc.graph.push(website());

        let json = doc.to_pretty_json().expect("serialize");
        assert!(json.ends_with("}\n"));

        let parsed: Document = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.context, SCHEMA_CONTEXT);
        assert_eq!(parsed.graph[0].type_name(), "WebSite");
        assert_eq!(parsed.graph[0].id(), "https://acme.example/#website");
    }

    #[test]
    fn partial_course_and_unknown_types_still_parse() {
        let json = r##"{
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "Course", "@id": "#c", "url": "https://acme.example/c"},
                {"@type": "VideoObject", "@id": "#v", "name": "Intro"}
            ]
        }"##;
        let doc: Document = serde_json::from_str(json).expect("deserialize");

        let course = doc.courses().next().expect("course node");
        assert_eq!(course.name, "");
        assert_eq!(course.provider, IdRef::default());
        assert_eq!(doc.graph[1], Node::Unknown);
        assert_eq!(doc.graph[1].id(), "");
    }

    #[test]
    fn postal_address_local_part() {
        let mut address = PostalAddress::new();
        assert!(!address.has_local_part());
        address.address_country = Some("US".into());
        assert!(!address.has_local_part());
        address.address_region = Some("TX".into());
        assert!(address.has_local_part());
    }
}
