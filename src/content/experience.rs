/**
 * Experience Entities
 * Work experience with nested accomplishments, plus education records.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::field;
use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    /// Empty means the position is current.
    pub end_date: String,
    pub description: String,
    pub category_ids: Vec<String>,
    pub technology_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Experience {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: field::text(&doc.data, "title"),
            company: field::text(&doc.data, "company"),
            location: field::text(&doc.data, "location"),
            start_date: field::text(&doc.data, "start_date"),
            end_date: field::text(&doc.data, "end_date"),
            description: field::text(&doc.data, "description"),
            category_ids: field::text_list(&doc.data, "category_ids"),
            technology_ids: field::text_list(&doc.data, "technology_ids"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }

    pub fn is_current(&self) -> bool {
        self.end_date.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceAccomplishment {
    pub id: String,
    pub experience_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExperienceAccomplishment {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            experience_id: field::text(&doc.data, "experience_id"),
            text: field::text(&doc.data, "text"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Education {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            degree: field::text(&doc.data, "degree"),
            institution: field::text(&doc.data, "institution"),
            start_date: field::text(&doc.data, "start_date"),
            end_date: field::text(&doc.data, "end_date"),
            location: field::text(&doc.data, "location"),
            description: field::text(&doc.data, "description"),
            is_current: field::flag(&doc.data, "is_current"),
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
    fn test_experience_missing_end_date_means_current() {
        let experience = Experience::from_doc(&doc(
            "e1",
            json!({ "title": "Engineer", "company": "Acme", "start_date": "2022-01" }),
        ));
        assert!(experience.is_current());
        assert_eq!(experience.end_date, "");
        assert!(experience.category_ids.is_empty());
        assert!(experience.technology_ids.is_empty());
    }

    #[test]
    fn test_experience_with_references() {
        let experience = Experience::from_doc(&doc(
            "e1",
            json!({
                "title": "Engineer",
                "end_date": "2024-06",
                "category_ids": ["c1", "c2"],
                "technology_ids": ["t1"]
            }),
        ));
        assert!(!experience.is_current());
        assert_eq!(experience.category_ids, vec!["c1", "c2"]);
        assert_eq!(experience.technology_ids, vec!["t1"]);
    }

    #[test]
    fn test_accomplishment_maps_parent_reference() {
        let accomplishment = ExperienceAccomplishment::from_doc(&doc(
            "a1",
            json!({ "experience_id": "e1", "text": "Shipped the thing" }),
        ));
        assert_eq!(accomplishment.experience_id, "e1");
        assert_eq!(accomplishment.text, "Shipped the thing");
    }

    #[test]
    fn test_education_defaults() {
        let education = Education::from_doc(&doc("ed1", json!({ "degree": "BSc" })));
        assert_eq!(education.degree, "BSc");
        assert_eq!(education.institution, "");
        assert!(!education.is_current);
    }
}
