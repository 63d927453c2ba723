/**
 * Taxonomy Entities
 * Categories (self-referential tree), technologies, skills, and the
 * current-tech-stack records that tie them together on the home page.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::content::field;
use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Self-referential parent reference; empty means a root category.
    pub parent_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            description: field::text(&doc.data, "description"),
            parent_id: field::text(&doc.data, "parent_id"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Walk the parent chain from `parent_id` and report whether assigning it
/// to `category_id` would close a cycle. `categories` is the id -> parent
/// arena of all existing categories.
pub fn would_form_cycle(
    category_id: &str,
    parent_id: &str,
    parents: &HashMap<String, String>,
) -> bool {
    let mut current = parent_id.to_string();
    let mut hops = 0;
    while !current.is_empty() {
        if current == category_id {
            return true;
        }
        // Cap the walk so a pre-existing corrupt chain cannot loop forever.
        hops += 1;
        if hops > parents.len() {
            return true;
        }
        current = parents.get(&current).cloned().unwrap_or_default();
    }
    false
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub icon: String,
    pub website: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Technology {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            category_id: field::text(&doc.data, "category_id"),
            icon: field::text(&doc.data, "icon"),
            website: field::text(&doc.data, "website"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Unknown raw values read as `Beginner` rather than failing the map.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "intermediate" => SkillLevel::Intermediate,
            "advanced" => SkillLevel::Advanced,
            "expert" => SkillLevel::Expert,
            _ => SkillLevel::Beginner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub technology_id: String,
    pub level: SkillLevel,
    /// Years of experience, half-step granularity.
    pub years: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            category_id: field::text(&doc.data, "category_id"),
            technology_id: field::text(&doc.data, "technology_id"),
            level: SkillLevel::parse(&field::text(&doc.data, "level")),
            years: field::number(&doc.data, "years"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTechStack {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub technology_ids: Vec<String>,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CurrentTechStack {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            category_id: field::text(&doc.data, "category_id"),
            technology_ids: field::text_list(&doc.data, "technology_ids"),
            priority: field::integer(&doc.data, "priority"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, data: serde_json::Value) -> Document {
        Document {
            id: id.to_string(),
            data,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_defaults_for_missing_fields() {
        let category = Category::from_doc(&doc("c1", json!({ "name": "Backend" })));
        assert_eq!(category.id, "c1");
        assert_eq!(category.name, "Backend");
        assert_eq!(category.description, "");
        assert_eq!(category.parent_id, "");
    }

    #[test]
    fn test_technology_maps_all_fields() {
        let tech = Technology::from_doc(&doc(
            "t1",
            json!({
                "name": "Axum",
                "category_id": "c1",
                "icon": "axum.svg",
                "website": "https://github.com/tokio-rs/axum"
            }),
        ));
        assert_eq!(tech.name, "Axum");
        assert_eq!(tech.category_id, "c1");
        assert_eq!(tech.icon, "axum.svg");
    }

    #[test]
    fn test_skill_level_parse_with_fallback() {
        assert_eq!(SkillLevel::parse("Expert"), SkillLevel::Expert);
        assert_eq!(SkillLevel::parse("advanced"), SkillLevel::Advanced);
        assert_eq!(SkillLevel::parse("wizard"), SkillLevel::Beginner);
        assert_eq!(SkillLevel::parse(""), SkillLevel::Beginner);
    }

    #[test]
    fn test_skill_years_defaults_to_zero() {
        let skill = Skill::from_doc(&doc("s1", json!({ "name": "Rust", "level": "Expert" })));
        assert_eq!(skill.years, 0.0);
        assert_eq!(skill.level, SkillLevel::Expert);
    }

    #[test]
    fn test_cycle_detection_on_parent_chain() {
        // a -> b -> c (parent pointers)
        let parents: HashMap<String, String> = [
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
            ("c".to_string(), String::new()),
        ]
        .into();

        // c taking a as parent closes a -> b -> c -> a
        assert!(would_form_cycle("c", "a", &parents));
        // a re-parenting to c is still a tree
        assert!(!would_form_cycle("a", "c", &parents));
        // self-parenting is a cycle
        assert!(would_form_cycle("x", "x", &parents));
        // detached parent chain terminates
        assert!(!would_form_cycle("new", "ghost", &parents));
    }
}
