//! Typed rows for the eight source tables.
//!
//! Every record is deserialized by header name. Required columns are plain
//! `String`s and are checked against the header before any row is read;
//! optional columns are `Option`s that default to `None` when the column is
//! absent or the cell is empty.

use serde::Deserialize;

/// A row type backed by one source table.
pub trait Record: serde::de::DeserializeOwned {
    /// Table name used in logs and errors.
    const TABLE: &'static str;

    /// Columns that must appear in the header.
    const REQUIRED_COLUMNS: &'static [&'static str];
}

/// Organization-wide values (singleton table).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrganizationVariables {
    pub organization_name: String,
    pub base_url: String,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub organization_description: Option<String>,
    #[serde(default)]
    pub organization_long_description: Option<String>,
    #[serde(default)]
    pub organization_logo_url: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub address_locality: Option<String>,
    #[serde(default)]
    pub address_region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub address_country: Option<String>,
    #[serde(default)]
    pub founding_date: Option<String>,
    #[serde(default)]
    pub organization_award: Option<String>,
    #[serde(default)]
    pub website_language: Option<String>,
    #[serde(default)]
    pub social_facebook: Option<String>,
    #[serde(default)]
    pub social_instagram: Option<String>,
    #[serde(default)]
    pub social_twitter: Option<String>,
    #[serde(default)]
    pub social_linkedin: Option<String>,
    #[serde(default)]
    pub social_youtube: Option<String>,
    #[serde(default)]
    pub social_tiktok: Option<String>,
}

impl Record for OrganizationVariables {
    const TABLE: &'static str = "organization_variables";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["organization_name", "base_url"];
}

impl OrganizationVariables {
    /// Base URL without a trailing slash, used to build node identifiers.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Non-blank social profile URLs in a fixed order.
    pub fn social_profiles(&self) -> Vec<String> {
        [
            &self.social_facebook,
            &self.social_instagram,
            &self.social_twitter,
            &self.social_linkedin,
            &self.social_youtube,
            &self.social_tiktok,
        ]
        .into_iter()
        .flatten()
        .filter(|url| !url.trim().is_empty())
        .cloned()
        .collect()
    }
}

/// One published category page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryPage {
    pub category_id: String,
    pub category_page_name: String,
    pub category_page_url: String,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub category_page_headline: Option<String>,
    #[serde(default)]
    pub category_page_alternative_headline: Option<String>,
    #[serde(default)]
    pub category_page_description: Option<String>,
    #[serde(default)]
    pub hero_image_url: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub catalog_id: Option<String>,
    #[serde(default)]
    pub catalog_name: Option<String>,
    #[serde(default)]
    pub catalog_description: Option<String>,
    #[serde(default)]
    pub breadcrumb_home_name: Option<String>,
}

impl Record for CategoryPage {
    const TABLE: &'static str = "category_pages";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["category_id", "category_page_name", "category_page_url"];
}

/// A descriptive topic of a category page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryTopic {
    pub category_id: String,
    pub topic_name: String,
    #[serde(default)]
    pub topic_description: Option<String>,
    #[serde(default)]
    pub topic_position: Option<u32>,
}

impl Record for CategoryTopic {
    const TABLE: &'static str = "category_topics";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["category_id", "topic_name"];
}

/// A course in the master list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub category_id: String,
    pub course_name: String,
    pub course_url: String,
    #[serde(default)]
    pub course_position: Option<u32>,
    #[serde(default)]
    pub course_alternate_name: Option<String>,
    #[serde(default)]
    pub course_description: Option<String>,
    #[serde(default)]
    pub course_abstract: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_price: Option<String>,
    #[serde(default)]
    pub course_currency: Option<String>,
    #[serde(default)]
    pub course_duration_iso8601: Option<String>,
    #[serde(default)]
    pub course_workload_iso8601: Option<String>,
    #[serde(default)]
    pub course_prerequisites: Option<String>,
    #[serde(default)]
    pub course_mode: Option<String>,
    #[serde(default)]
    pub course_credential: Option<String>,
    #[serde(default)]
    pub course_level: Option<String>,
    #[serde(default)]
    pub course_language: Option<String>,
    #[serde(default)]
    pub course_audience_type: Option<String>,
    #[serde(default)]
    pub offer_category: Option<String>,
    #[serde(default)]
    pub offer_availability_starts: Option<String>,
    #[serde(default)]
    pub offer_valid_from: Option<String>,
    #[serde(default)]
    pub offer_delivery_method: Option<String>,
    #[serde(default)]
    pub course_benefits: Option<String>,
    #[serde(default)]
    pub course_educational_use: Option<String>,
    #[serde(default)]
    pub course_learning_resource_type: Option<String>,
    #[serde(default)]
    pub course_interactivity_type: Option<String>,
    #[serde(default)]
    pub course_age_range: Option<String>,
    #[serde(default)]
    pub course_timezone: Option<String>,
    #[serde(default)]
    pub course_instructor_org: Option<String>,
    #[serde(default)]
    pub eligible_region_type: Option<String>,
    #[serde(default)]
    pub eligible_region_name: Option<String>,
    #[serde(default)]
    pub eligible_region_code: Option<String>,
    #[serde(default)]
    pub location_created_type: Option<String>,
    #[serde(default)]
    pub location_created_name: Option<String>,
    #[serde(default)]
    pub location_created_region: Option<String>,
    #[serde(default)]
    pub geographic_type: Option<String>,
    #[serde(default)]
    pub geographic_name: Option<String>,
}

impl Record for Course {
    const TABLE: &'static str = "courses";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["course_id", "category_id", "course_name", "course_url"];
}

/// One thing a course teaches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CourseTopic {
    pub course_id: String,
    pub topic: String,
    #[serde(default)]
    pub topic_position: Option<u32>,
}

impl Record for CourseTopic {
    const TABLE: &'static str = "course_topics";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["course_id", "topic"];
}

/// A geographic area a category's courses are offered in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AreaServed {
    pub category_id: String,
    pub area_served_name: String,
    #[serde(default)]
    pub area_served_type: Option<String>,
    #[serde(default)]
    pub area_served_code: Option<String>,
    #[serde(default)]
    pub area_served_description: Option<String>,
    #[serde(default)]
    pub address_country: Option<String>,
}

impl Record for AreaServed {
    const TABLE: &'static str = "areas_served";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["category_id", "area_served_name"];
}

/// A keyword tag attached to a category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryTag {
    pub category_id: String,
    pub tag: String,
}

impl Record for CategoryTag {
    const TABLE: &'static str = "category_tags";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["category_id", "tag"];
}

/// A question and answer shown on a category page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Faq {
    pub category_id: String,
    pub faq_question: String,
    pub faq_answer: String,
    #[serde(default)]
    pub faq_position: Option<u32>,
}

impl Record for Faq {
    const TABLE: &'static str = "faqs";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["category_id", "faq_question", "faq_answer"];
}

/// Return the trimmed value when it is non-blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_profiles_skip_blanks() {
        let org = OrganizationVariables {
            social_facebook: Some("https://facebook.com/acme".into()),
            social_instagram: Some("   ".into()),
            social_youtube: Some("https://youtube.com/@acme".into()),
            ..Default::default()
        };
        assert_eq!(
            org.social_profiles(),
            vec![
                "https://facebook.com/acme".to_string(),
                "https://youtube.com/@acme".to_string()
            ]
        );
    }

    #[test]
    fn base_trims_trailing_slash() {
        let org = OrganizationVariables {
            base_url: "https://acme.example/".into(),
            ..Default::default()
        };
        assert_eq!(org.base(), "https://acme.example");
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(&Some("  x ".into())), Some("x"));
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&None), None);
    }
}
