/**
 * Project Entity
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::attachment::ImageRef;
use crate::content::field;
use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub long_description: String,
    pub image: ImageRef,
    pub category_ids: Vec<String>,
    pub technology_ids: Vec<String>,
    pub github: String,
    pub live: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            description: field::text(&doc.data, "description"),
            long_description: field::text(&doc.data, "long_description"),
            image: ImageRef::from_field(&doc.data, "image_id"),
            category_ids: field::text_list(&doc.data, "category_ids"),
            technology_ids: field::text_list(&doc.data, "technology_ids"),
            github: field::text(&doc.data, "github"),
            live: field::text(&doc.data, "live"),
            featured: field::flag(&doc.data, "featured"),
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
    fn test_project_defaults() {
        let project = Project::from_doc(&doc("p1", json!({ "name": "devfolio" })));
        assert_eq!(project.name, "devfolio");
        assert_eq!(project.long_description, "");
        assert!(!project.featured);
        assert!(project.image.is_placeholder());
        assert!(project.technology_ids.is_empty());
    }

    #[test]
    fn test_project_image_url_derived_from_object_id() {
        let project = Project::from_doc(&doc(
            "p1",
            json!({ "name": "devfolio", "image_id": "shot.png", "featured": true }),
        ));
        assert_eq!(project.image.id, "shot.png");
        assert!(project.image.url.ends_with("/shot.png"));
        assert!(project.featured);
    }
}
