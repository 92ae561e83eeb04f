//! Breadcrumb trails and output slugs derived from category page URLs.
//!
//! The trail is built from URL path segments: the site root, one entry per
//! intermediate segment, then the category page itself.

use tracing::debug;
use url::Url;

use coursegraph_shared::jsonld::{BreadcrumbList, ListItem};
use coursegraph_shared::{CategoryPage, OrganizationVariables, non_blank};

/// Label of the first breadcrumb when the category row does not name it.
const DEFAULT_HOME_NAME: &str = "Home";

/// Build the breadcrumb trail for a category page.
pub fn build_breadcrumb(org: &OrganizationVariables, category: &CategoryPage) -> BreadcrumbList {
    let home_name = non_blank(&category.breadcrumb_home_name).unwrap_or(DEFAULT_HOME_NAME);
    let mut names_and_urls: Vec<(String, String)> =
        vec![(home_name.to_string(), format!("{}/", org.base()))];

    let page_url = category.category_page_url.trim();
    match Url::parse(page_url) {
        Ok(url) => {
            let origin = url.origin().ascii_serialization();
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|seg| !seg.is_empty()).collect())
                .unwrap_or_default();

            // Every segment but the last is an intermediate listing page.
            let intermediate = segments.len().saturating_sub(1);
            for depth in 0..intermediate {
                names_and_urls.push((
                    title_from_slug(segments[depth]),
                    format!("{origin}/{}/", segments[..=depth].join("/")),
                ));
            }
        }
        Err(e) => {
            debug!(url = page_url, error = %e, "category URL does not parse, flat breadcrumb");
        }
    }

    names_and_urls.push((
        category.category_page_name.trim().to_string(),
        page_url.to_string(),
    ));

    BreadcrumbList {
        kind: "BreadcrumbList".into(),
        item_list_element: names_and_urls
            .into_iter()
            .enumerate()
            .map(|(i, (name, item))| ListItem {
                kind: "ListItem".into(),
                position: i + 1,
                name,
                item: (!item.is_empty()).then_some(item),
            })
            .collect(),
    }
}

/// File-name-safe slug for a category.
///
/// Uses `category_slug` when set, else the last path segment of the page URL,
/// else the category id.
pub fn category_slug(category: &CategoryPage) -> String {
    let candidates = [
        non_blank(&category.category_slug).map(str::to_string),
        last_path_segment(&category.category_page_url),
        Some(category.category_id.clone()),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|c| slugify(&c))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "category".to_string())
}

/// Lowercase kebab-case, keeping only alphanumerics and dashes.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let cleaned = lowered
        .trim_end_matches(".html")
        .trim_end_matches(".htm")
        .replace([' ', '_', '/'], "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>();

    cleaned
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn last_path_segment(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Extract a human-readable title from a path slug.
fn title_from_slug(segment: &str) -> String {
    segment
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.collect::<String>())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> OrganizationVariables {
        OrganizationVariables {
            organization_name: "Acme Driving School".into(),
            base_url: "https://acme.example/".into(),
            ..Default::default()
        }
    }

    fn page(url: &str) -> CategoryPage {
        CategoryPage {
            category_id: "drivers-ed".into(),
            category_page_name: "Driver's Ed".into(),
            category_page_url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn breadcrumb_follows_path_segments() {
        let trail = build_breadcrumb(&org(), &page("https://acme.example/online-courses/drivers-ed"));
        let items = &trail.item_list_element;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Home");
        assert_eq!(items[0].item.as_deref(), Some("https://acme.example/"));
        assert_eq!(items[1].name, "Online Courses");
        assert_eq!(
            items[1].item.as_deref(),
            Some("https://acme.example/online-courses/")
        );
        assert_eq!(items[2].name, "Driver's Ed");
        assert_eq!(items[2].position, 3);
    }

    #[test]
    fn breadcrumb_top_level_page_is_home_then_category() {
        let mut category = page("https://acme.example/drivers-ed/");
        category.breadcrumb_home_name = Some("Acme".into());

        let trail = build_breadcrumb(&org(), &category);
        let names: Vec<&str> = trail
            .item_list_element
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, ["Acme", "Driver's Ed"]);
    }

    #[test]
    fn breadcrumb_with_unparsable_url() {
        let trail = build_breadcrumb(&org(), &page("drivers-ed"));
        assert_eq!(trail.item_list_element.len(), 2);
        assert_eq!(trail.item_list_element[1].item.as_deref(), Some("drivers-ed"));
    }

    #[test]
    fn slug_prefers_explicit_then_url_then_id() {
        let mut category = page("https://acme.example/courses/Defensive_Driving.html");
        assert_eq!(category_slug(&category), "defensive-driving");

        category.category_slug = Some("Teen Ed".into());
        assert_eq!(category_slug(&category), "teen-ed");

        let category = page("not a url");
        assert_eq!(category_slug(&category), "drivers-ed");
    }

    #[test]
    fn slugify_handles_common_patterns() {
        assert_eq!(slugify("Driver's Ed"), "drivers-ed");
        assert_eq!(slugify("  API_Reference.html "), "api-reference");
        assert_eq!(slugify("a / b"), "a-b");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Foo.HTML"), "foo");
        assert_eq!(slugify("Intro.Htm"), "intro");
    }

    #[test]
    fn title_from_slug_converts_slugs() {
        assert_eq!(title_from_slug("getting-started"), "Getting Started");
        assert_eq!(title_from_slug("api_reference"), "Api Reference");
    }
}
