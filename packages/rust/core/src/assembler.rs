//! JSON-LD document assembler.
//!
//! Maps a [`ResolvedCategory`] plus the organization row onto one
//! [`Document`]. Assembly is a structural mapping: a property is present
//! exactly when its source field is non-blank, apart from the few defaults
//! named in [`AssemblerOptions`].

use tracing::{debug, instrument};

use coursegraph_shared::jsonld::{
    Answer, Audience, CatalogOffer, CollectionPageNode, CourseInstance, CourseNode, FaqPageNode,
    Offer, OfferCatalogNode, OrganizationNode, Place, PostalAddress, Question, Schedule, Thing,
    WebSiteNode,
};
use coursegraph_shared::{
    CategoryPage, Course, Document, GenerationConfig, IdRef, Node, OrganizationVariables,
    non_blank,
};

use crate::breadcrumb::build_breadcrumb;
use crate::resolver::{ResolvedCategory, ResolvedCourse};

/// Availability attached to offers that carry a price.
const IN_STOCK: &str = "https://schema.org/InStock";

/// Hook applied to every assembled document before it is returned.
pub type PostProcess = Box<dyn Fn(Document) -> Document + Send + Sync>;

/// Defaults applied during assembly.
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// Currency for priced offers whose row has none.
    pub default_currency: String,
    /// Country for addresses that have other address fields.
    pub default_country: String,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for AssemblerOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            default_currency: config.default_currency.clone(),
            default_country: config.default_country.clone(),
        }
    }
}

/// Builds documents with fixed options and an optional post-processing hook.
#[derive(Default)]
pub struct Assembler {
    options: AssemblerOptions,
    post_process: Option<PostProcess>,
}

impl std::fmt::Debug for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assembler")
            .field("options", &self.options)
            .field("post_process", &self.post_process.is_some())
            .finish()
    }
}

impl Assembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self {
            options,
            post_process: None,
        }
    }

    /// Install a hook that rewrites each assembled document.
    pub fn with_post_process(
        mut self,
        hook: impl Fn(Document) -> Document + Send + Sync + 'static,
    ) -> Self {
        self.post_process = Some(Box::new(hook));
        self
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Assemble the document for one resolved category.
    ///
    /// Graph order: WebSite, EducationalOrganization, CollectionPage,
    /// OfferCatalog, FAQPage (only with FAQs), then one Course per resolved
    /// course in resolved order.
    #[instrument(skip_all, fields(category_id = %resolved.category.category_id))]
    pub fn assemble(&self, resolved: &ResolvedCategory<'_>, org: &OrganizationVariables) -> Document {
        let ids = NodeIds::new(org, resolved.category);

        let mut doc = Document::new();
        doc.graph.push(Node::WebSite(website(org, &ids)));
        doc.graph
            .push(Node::EducationalOrganization(self.organization(org, &ids)));
        doc.graph
            .push(Node::CollectionPage(collection_page(org, resolved, &ids)));
        doc.graph
            .push(Node::OfferCatalog(self.offer_catalog(resolved, &ids)));

        if let Some(faq) = faq_page(resolved, &ids) {
            doc.graph.push(Node::FaqPage(faq));
        }

        for course in &resolved.courses {
            doc.graph.push(Node::Course(self.course(course, &ids)));
        }

        debug!(nodes = doc.graph.len(), "document assembled");

        match &self.post_process {
            Some(hook) => hook(doc),
            None => doc,
        }
    }

    fn organization(&self, org: &OrganizationVariables, ids: &NodeIds) -> OrganizationNode {
        let address = self.address(PostalAddress {
            street_address: owned(&org.street_address),
            address_locality: owned(&org.address_locality),
            address_region: owned(&org.address_region),
            postal_code: owned(&org.postal_code),
            address_country: owned(&org.address_country),
            ..PostalAddress::new()
        });

        OrganizationNode {
            id: ids.organization.clone(),
            name: org.organization_name.trim().to_string(),
            legal_name: owned(&org.legal_name),
            description: owned(&org.organization_long_description)
                .or_else(|| owned(&org.organization_description)),
            url: org.base_url.trim().to_string(),
            logo: owned(&org.organization_logo_url),
            telephone: owned(&org.telephone),
            email: owned(&org.email),
            address,
            same_as: org.social_profiles(),
            founding_date: owned(&org.founding_date),
            award: owned(&org.organization_award),
        }
    }

    fn offer_catalog(&self, resolved: &ResolvedCategory<'_>, ids: &NodeIds) -> OfferCatalogNode {
        let category = resolved.category;

        let item_list_element = resolved
            .courses
            .iter()
            .enumerate()
            .map(|(i, resolved_course)| {
                let course = resolved_course.course;
                let price = course.course_price.as_deref().and_then(normalize_price);
                CatalogOffer {
                    kind: "Offer".into(),
                    position: i + 1,
                    item_offered: IdRef::new(course_node_id(course)),
                    price_currency: self.currency(course, price.is_some()),
                    price,
                    url: non_empty(&course.course_url),
                }
            })
            .collect::<Vec<_>>();

        let area_served = resolved
            .areas
            .iter()
            .map(|area| Place {
                kind: non_blank(&area.area_served_type)
                    .unwrap_or("State")
                    .to_string(),
                name: area.area_served_name.trim().to_string(),
                alternate_name: owned(&area.area_served_code),
                description: owned(&area.area_served_description),
                address: self.address(PostalAddress {
                    address_region: owned(&area.area_served_code),
                    address_country: owned(&area.address_country),
                    ..PostalAddress::new()
                }),
            })
            .collect();

        OfferCatalogNode {
            id: ids.catalog.clone(),
            name: owned(&category.catalog_name)
                .unwrap_or_else(|| category.category_page_name.trim().to_string()),
            description: owned(&category.catalog_description),
            number_of_items: item_list_element.len(),
            provider: IdRef::new(&ids.organization),
            item_list_element,
            area_served,
            category: resolved
                .tags
                .iter()
                .map(|t| t.tag.trim().to_string())
                .collect(),
        }
    }

    fn course(&self, resolved: &ResolvedCourse<'_>, ids: &NodeIds) -> CourseNode {
        let course = resolved.course;
        let price = course.course_price.as_deref().and_then(normalize_price);

        let course_mode: Vec<String> = non_blank(&course.course_mode)
            .map(|modes| {
                modes
                    .split(';')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let course_workload = owned(&course.course_workload_iso8601);
        let course_schedule = owned(&course.course_timezone).map(|schedule_timezone| Schedule {
            kind: "Schedule".into(),
            schedule_timezone,
        });
        let instructor = owned(&course.course_instructor_org).map(|name| Thing {
            kind: "Organization".into(),
            name,
            description: None,
        });
        let has_course_instance = (!course_mode.is_empty()
            || course_workload.is_some()
            || course_schedule.is_some()
            || instructor.is_some())
        .then(|| CourseInstance {
            kind: "CourseInstance".into(),
            course_mode,
            course_workload,
            course_schedule,
            instructor,
        });

        let audience_type = owned(&course.course_audience_type);
        let geographic_area = owned(&course.geographic_name).map(|name| Thing {
            kind: non_blank(&course.geographic_type)
                .unwrap_or("AdministrativeArea")
                .to_string(),
            name,
            description: None,
        });
        let audience = (audience_type.is_some() || geographic_area.is_some()).then(|| Audience {
            kind: "Audience".into(),
            audience_type,
            geographic_area,
        });

        CourseNode {
            id: course_node_id(course),
            name: course.course_name.trim().to_string(),
            alternate_name: owned(&course.course_alternate_name),
            description: owned(&course.course_description),
            summary: owned(&course.course_abstract),
            url: course.course_url.trim().to_string(),
            course_code: non_blank(&course.course_code)
                .filter(|code| !code.eq_ignore_ascii_case("n/a"))
                .map(str::to_string),
            time_required: owned(&course.course_duration_iso8601),
            course_prerequisites: owned(&course.course_prerequisites),
            educational_credential_awarded: owned(&course.course_credential),
            occupational_credential_awarded: owned(&course.course_benefits),
            educational_level: owned(&course.course_level),
            in_language: owned(&course.course_language),
            teaches: resolved
                .topics
                .iter()
                .map(|t| t.topic.trim().to_string())
                .collect(),
            audience,
            has_course_instance,
            offers: Offer {
                kind: "Offer".into(),
                price_currency: self.currency(course, price.is_some()),
                availability: price.as_ref().map(|_| IN_STOCK.to_string()),
                price,
                category: owned(&course.offer_category),
                availability_starts: owned(&course.offer_availability_starts),
                valid_from: owned(&course.offer_valid_from),
                url: non_empty(&course.course_url),
                eligible_region: self.place(
                    &course.eligible_region_type,
                    &course.eligible_region_name,
                    &course.eligible_region_code,
                    "State",
                ),
                delivery_method: owned(&course.offer_delivery_method),
            },
            provider: IdRef::new(&ids.organization),
            is_part_of: IdRef::new(&ids.collection_page),
            location_created: self.place(
                &course.location_created_type,
                &course.location_created_name,
                &course.location_created_region,
                "Place",
            ),
            educational_use: owned(&course.course_educational_use),
            learning_resource_type: owned(&course.course_learning_resource_type),
            interactivity_type: owned(&course.course_interactivity_type),
            typical_age_range: owned(&course.course_age_range),
        }
    }

    /// A named place with an optional region, or `None` without a name.
    fn place(
        &self,
        kind: &Option<String>,
        name: &Option<String>,
        region: &Option<String>,
        default_kind: &str,
    ) -> Option<Place> {
        let name = owned(name)?;
        Some(Place {
            kind: non_blank(kind).unwrap_or(default_kind).to_string(),
            name,
            alternate_name: None,
            description: None,
            address: self.address(PostalAddress {
                address_region: owned(region),
                ..PostalAddress::new()
            }),
        })
    }

    /// Row currency, or the default currency when the offer has a price.
    fn currency(&self, course: &Course, priced: bool) -> Option<String> {
        owned(&course.course_currency)
            .or_else(|| priced.then(|| self.options.default_currency.clone()))
    }

    /// Apply the default country and drop addresses with no fields at all.
    fn address(&self, mut address: PostalAddress) -> Option<PostalAddress> {
        if address.has_local_part() && address.address_country.is_none() {
            address.address_country = Some(self.options.default_country.clone());
        }
        address.address_country.is_some().then_some(address)
    }
}

/// Assemble with default options and no hook.
pub fn assemble(resolved: &ResolvedCategory<'_>, org: &OrganizationVariables) -> Document {
    Assembler::default().assemble(resolved, org)
}

// ---------------------------------------------------------------------------
// Node builders
// ---------------------------------------------------------------------------

/// `@id` values shared between nodes of one document.
struct NodeIds {
    website: String,
    organization: String,
    collection_page: String,
    catalog: String,
    faq: String,
}

impl NodeIds {
    fn new(org: &OrganizationVariables, category: &CategoryPage) -> Self {
        let base = org.base();
        let page_url = category.category_page_url.trim();
        let catalog = match non_blank(&category.catalog_id) {
            Some(id) => format!("#{id}"),
            None => format!("#{}-catalog", category.category_id),
        };
        Self {
            website: format!("{base}/#website"),
            organization: format!("{base}/#organization"),
            collection_page: format!("{page_url}#catalog"),
            catalog,
            faq: format!("{page_url}#faq"),
        }
    }
}

fn website(org: &OrganizationVariables, ids: &NodeIds) -> WebSiteNode {
    WebSiteNode {
        id: ids.website.clone(),
        name: org.organization_name.trim().to_string(),
        url: org.base_url.trim().to_string(),
        description: owned(&org.organization_description),
        in_language: owned(&org.website_language),
        publisher: IdRef::new(&ids.organization),
    }
}

fn collection_page(
    org: &OrganizationVariables,
    resolved: &ResolvedCategory<'_>,
    ids: &NodeIds,
) -> CollectionPageNode {
    let category = resolved.category;

    CollectionPageNode {
        id: ids.collection_page.clone(),
        url: category.category_page_url.trim().to_string(),
        name: category.category_page_name.trim().to_string(),
        headline: owned(&category.category_page_headline),
        alternative_headline: owned(&category.category_page_alternative_headline),
        description: owned(&category.category_page_description),
        image: owned(&category.hero_image_url),
        date_modified: owned(&category.date_modified),
        about: resolved
            .topics
            .iter()
            .map(|topic| Thing {
                kind: "Thing".into(),
                name: topic.topic_name.trim().to_string(),
                description: owned(&topic.topic_description),
            })
            .collect(),
        keywords: resolved
            .tags
            .iter()
            .map(|t| t.tag.trim().to_string())
            .collect(),
        is_part_of: IdRef::new(&ids.website),
        breadcrumb: build_breadcrumb(org, category),
        main_entity: IdRef::new(&ids.catalog),
        has_part: (!resolved.faqs.is_empty()).then(|| IdRef::new(&ids.faq)),
    }
}

/// The FAQ page, or `None` when the category has no questions.
fn faq_page(resolved: &ResolvedCategory<'_>, ids: &NodeIds) -> Option<FaqPageNode> {
    if resolved.faqs.is_empty() {
        return None;
    }

    Some(FaqPageNode {
        id: ids.faq.clone(),
        main_entity: resolved
            .faqs
            .iter()
            .map(|faq| Question {
                kind: "Question".into(),
                name: faq.faq_question.trim().to_string(),
                accepted_answer: Answer {
                    kind: "Answer".into(),
                    text: faq.faq_answer.trim().to_string(),
                },
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `{course_url}#course`, or `#{course_id}` when the course has no URL.
pub fn course_node_id(course: &Course) -> String {
    let url = course.course_url.trim();
    if url.is_empty() {
        format!("#{}", course.course_id)
    } else {
        format!("{url}#course")
    }
}

/// Strip currency symbols, thousands separators and whitespace.
///
/// Returns `None` when nothing is left.
pub fn normalize_price(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '$' | '€' | '£'))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn owned(value: &Option<String>) -> Option<String> {
    non_blank(value).map(str::to_string)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_category;
    use crate::test_support::{
        area, category, course, course_topic, faq, organization, store_with, tag, topic,
    };
    use coursegraph_tables::{TableStore, Tables};

    fn drivers_ed_store() -> TableStore {
        let mut de101 = course("DE101", "drivers-ed", "Teen Driver's Ed");
        de101.course_duration_iso8601 = Some("PT30H".into());
        de101.course_price = Some("$1,299.00".into());
        de101.course_code = Some("N/A".into());
        de101.course_mode = Some("online; blended".into());
        de101.course_benefits = Some("Texas learner license eligibility".into());
        de101.course_educational_use = Some("Driver education".into());
        de101.course_learning_resource_type = Some("Course".into());
        de101.course_interactivity_type = Some("mixed".into());
        de101.course_age_range = Some("14-17".into());
        de101.course_timezone = Some("America/Chicago".into());
        de101.course_instructor_org = Some("Acme Driving School".into());
        de101.eligible_region_name = Some("Texas".into());
        de101.eligible_region_code = Some("TX".into());
        de101.offer_delivery_method = Some("OnlineOnly".into());
        de101.location_created_name = Some("Austin".into());
        de101.location_created_type = Some("City".into());
        de101.location_created_region = Some("TX".into());
        de101.geographic_name = Some("Texas".into());
        de101.geographic_type = Some("State".into());

        store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            category_topics: vec![topic("drivers-ed", "Road rules")],
            courses: vec![de101, course("DE102", "drivers-ed", "Adult Driver's Ed")],
            course_topics: vec![
                course_topic("DE101", "Signs"),
                course_topic("DE101", "Merging"),
            ],
            areas_served: vec![area("drivers-ed", "Texas", Some("TX"))],
            category_tags: vec![tag("drivers-ed", "teen"), tag("drivers-ed", "permit")],
            faqs: vec![faq("drivers-ed", "How long?", "30 hours.")],
        })
    }

    #[test]
    fn graph_order_is_fixed() {
        let store = drivers_ed_store();
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let doc = assemble(&resolved, store.organization());

        let types: Vec<&str> = doc.graph.iter().map(Node::type_name).collect();
        assert_eq!(
            types,
            [
                "WebSite",
                "EducationalOrganization",
                "CollectionPage",
                "OfferCatalog",
                "FAQPage",
                "Course",
                "Course"
            ]
        );
    }

    #[test]
    fn catalog_lists_one_offer_per_course() {
        let store = drivers_ed_store();
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let doc = assemble(&resolved, store.organization());

        let catalog = doc.offer_catalog().unwrap();
        assert_eq!(catalog.number_of_items, 2);
        assert_eq!(catalog.item_list_element.len(), 2);
        assert_eq!(
            catalog.item_list_element[0].item_offered.id,
            "https://acme.example/courses/de101#course"
        );
        assert_eq!(catalog.item_list_element[1].position, 2);
        assert_eq!(catalog.area_served[0].kind, "State");
        assert_eq!(
            catalog.area_served[0]
                .address
                .as_ref()
                .and_then(|a| a.address_country.as_deref()),
            Some("US")
        );
    }

    #[test]
    fn course_fields_are_mapped() {
        let store = drivers_ed_store();
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let doc = assemble(&resolved, store.organization());

        let courses: Vec<&CourseNode> = doc.courses().collect();
        let de101 = courses[0];
        assert_eq!(de101.name, "Teen Driver's Ed");
        assert_eq!(de101.time_required.as_deref(), Some("PT30H"));
        assert_eq!(de101.teaches, ["Signs", "Merging"]);
        assert_eq!(de101.course_code, None);
        assert_eq!(de101.offers.price.as_deref(), Some("1299.00"));
        assert_eq!(de101.offers.price_currency.as_deref(), Some("USD"));
        assert_eq!(de101.offers.availability.as_deref(), Some(IN_STOCK));
        assert_eq!(
            de101.has_course_instance.as_ref().unwrap().course_mode,
            ["online", "blended"]
        );
        assert_eq!(de101.is_part_of.id, "https://acme.example/courses/drivers-ed#catalog");
        assert_eq!(
            de101.occupational_credential_awarded.as_deref(),
            Some("Texas learner license eligibility")
        );
        assert_eq!(de101.educational_use.as_deref(), Some("Driver education"));
        assert_eq!(de101.learning_resource_type.as_deref(), Some("Course"));
        assert_eq!(de101.interactivity_type.as_deref(), Some("mixed"));
        assert_eq!(de101.typical_age_range.as_deref(), Some("14-17"));

        let instance = de101.has_course_instance.as_ref().unwrap();
        assert_eq!(
            instance
                .course_schedule
                .as_ref()
                .map(|s| s.schedule_timezone.as_str()),
            Some("America/Chicago")
        );
        let instructor = instance.instructor.as_ref().unwrap();
        assert_eq!(instructor.kind, "Organization");
        assert_eq!(instructor.name, "Acme Driving School");

        let region = de101.offers.eligible_region.as_ref().unwrap();
        assert_eq!(region.kind, "State");
        assert_eq!(region.name, "Texas");
        let address = region.address.as_ref().unwrap();
        assert_eq!(address.address_region.as_deref(), Some("TX"));
        assert_eq!(address.address_country.as_deref(), Some("US"));
        assert_eq!(de101.offers.delivery_method.as_deref(), Some("OnlineOnly"));

        let created = de101.location_created.as_ref().unwrap();
        assert_eq!(created.kind, "City");
        assert_eq!(created.name, "Austin");

        let audience = de101.audience.as_ref().unwrap();
        assert_eq!(audience.audience_type, None);
        let area = audience.geographic_area.as_ref().unwrap();
        assert_eq!((area.kind.as_str(), area.name.as_str()), ("State", "Texas"));

        // No price, no inferred currency or availability.
        let de102 = courses[1];
        assert_eq!(de102.offers.price, None);
        assert_eq!(de102.offers.price_currency, None);
        assert_eq!(de102.offers.availability, None);
        assert!(de102.teaches.is_empty());
        assert!(de102.has_course_instance.is_none());
        assert!(de102.audience.is_none());
        assert!(de102.offers.eligible_region.is_none());
        assert!(de102.location_created.is_none());
    }

    #[test]
    fn topics_and_tags_attach_to_collection_page() {
        let store = drivers_ed_store();
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let doc = assemble(&resolved, store.organization());

        let page = doc.collection_page().unwrap();
        assert_eq!(page.about[0].name, "Road rules");
        assert_eq!(page.keywords, ["teen", "permit"]);
        assert_eq!(doc.offer_catalog().unwrap().category, ["teen", "permit"]);
        assert_eq!(
            page.has_part.as_ref().map(|r| r.id.as_str()),
            Some("https://acme.example/courses/drivers-ed#faq")
        );
    }

    #[test]
    fn zero_faqs_omit_faq_page() {
        let store = store_with(Tables {
            category_pages: vec![category("drivers-ed", "Driver's Ed")],
            ..Default::default()
        });
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let doc = assemble(&resolved, store.organization());

        assert!(doc.faq_page().is_none());
        assert!(doc.collection_page().unwrap().has_part.is_none());
        let json = doc.to_pretty_json().unwrap();
        assert!(!json.contains("FAQPage"));
    }

    #[test]
    fn organization_is_identical_across_categories() {
        let store = store_with(Tables {
            category_pages: vec![
                category("drivers-ed", "Driver's Ed"),
                category("boating", "Boating"),
            ],
            ..Default::default()
        });
        let a = assemble(&resolve_category("drivers-ed", &store).unwrap(), store.organization());
        let b = assemble(&resolve_category("boating", &store).unwrap(), store.organization());
        assert_eq!(a.graph[1], b.graph[1]);
        assert_eq!(a.graph[0], b.graph[0]);
    }

    #[test]
    fn organization_address_defaults_country() {
        let mut org = organization();
        org.address_region = Some("TX".into());
        org.social_twitter = Some("https://x.com/acme".into());

        let store = TableStore::from_tables(
            org,
            Tables {
                category_pages: vec![category("drivers-ed", "Driver's Ed")],
                ..Default::default()
            },
        );
        let doc = assemble(&resolve_category("drivers-ed", &store).unwrap(), store.organization());

        let Node::EducationalOrganization(node) = &doc.graph[1] else {
            panic!("expected organization node");
        };
        let address = node.address.as_ref().unwrap();
        assert_eq!(address.address_region.as_deref(), Some("TX"));
        assert_eq!(address.address_country.as_deref(), Some("US"));
        assert_eq!(node.same_as, ["https://x.com/acme"]);
    }

    #[test]
    fn post_process_hook_runs_last() {
        let store = drivers_ed_store();
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let assembler = Assembler::new(AssemblerOptions::default()).with_post_process(|mut doc| {
            doc.graph.retain(|node| !matches!(node, Node::FaqPage(_)));
            doc
        });

        let doc = assembler.assemble(&resolved, store.organization());
        assert!(doc.faq_page().is_none());
        assert_eq!(doc.courses().count(), 2);
    }

    #[test]
    fn custom_currency_is_used_for_priced_rows() {
        let store = drivers_ed_store();
        let resolved = resolve_category("drivers-ed", &store).unwrap();
        let assembler = Assembler::new(AssemblerOptions {
            default_currency: "CAD".into(),
            default_country: "CA".into(),
        });

        let doc = assembler.assemble(&resolved, store.organization());
        let first = doc.courses().next().unwrap();
        assert_eq!(first.offers.price_currency.as_deref(), Some("CAD"));
    }

    #[test]
    fn normalize_price_strips_formatting() {
        assert_eq!(normalize_price("$1,299.00").as_deref(), Some("1299.00"));
        assert_eq!(normalize_price(" 49 ").as_deref(), Some("49"));
        assert_eq!(normalize_price("Free").as_deref(), Some("Free"));
        assert_eq!(normalize_price(" $ "), None);
    }

    #[test]
    fn course_without_url_gets_fragment_id() {
        let mut row = course("DE101", "drivers-ed", "Teen Driver's Ed");
        row.course_url = "  ".into();
        assert_eq!(course_node_id(&row), "#DE101");
    }
}
