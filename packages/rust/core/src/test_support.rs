//! Row builders shared by the unit tests in this crate.

use coursegraph_shared::{
    AreaServed, CategoryPage, CategoryTag, CategoryTopic, Course, CourseTopic, Faq,
    OrganizationVariables,
};
use coursegraph_tables::{TableStore, Tables};

pub fn organization() -> OrganizationVariables {
    OrganizationVariables {
        organization_name: "Acme Driving School".into(),
        base_url: "https://acme.example".into(),
        organization_description: Some("Driver education across Texas.".into()),
        ..Default::default()
    }
}

pub fn category(id: &str, name: &str) -> CategoryPage {
    CategoryPage {
        category_id: id.into(),
        category_page_name: name.into(),
        category_page_url: format!("https://acme.example/courses/{id}"),
        ..Default::default()
    }
}

pub fn topic(category_id: &str, name: &str) -> CategoryTopic {
    CategoryTopic {
        category_id: category_id.into(),
        topic_name: name.into(),
        ..Default::default()
    }
}

pub fn course(id: &str, category_id: &str, name: &str) -> Course {
    Course {
        course_id: id.into(),
        category_id: category_id.into(),
        course_name: name.into(),
        course_url: format!("https://acme.example/courses/{}", id.to_lowercase()),
        ..Default::default()
    }
}

pub fn course_topic(course_id: &str, topic: &str) -> CourseTopic {
    CourseTopic {
        course_id: course_id.into(),
        topic: topic.into(),
        ..Default::default()
    }
}

pub fn area(category_id: &str, name: &str, code: Option<&str>) -> AreaServed {
    AreaServed {
        category_id: category_id.into(),
        area_served_name: name.into(),
        area_served_code: code.map(str::to_string),
        ..Default::default()
    }
}

pub fn tag(category_id: &str, tag: &str) -> CategoryTag {
    CategoryTag {
        category_id: category_id.into(),
        tag: tag.into(),
    }
}

pub fn faq(category_id: &str, question: &str, answer: &str) -> Faq {
    Faq {
        category_id: category_id.into(),
        faq_question: question.into(),
        faq_answer: answer.into(),
        ..Default::default()
    }
}

pub fn store_with(tables: Tables) -> TableStore {
    TableStore::from_tables(organization(), tables)
}
