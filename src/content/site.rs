/**
 * Site Records
 * Contact submissions, visitor analytics, guest book messages, and the
 * key/value site settings store. Plain records, no cross-entity
 * resolution.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::field;
use crate::db::store::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactSubmission {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            email: field::text(&doc.data, "email"),
            subject: field::text(&doc.data, "subject"),
            message: field::text(&doc.data, "message"),
            read: field::flag(&doc.data, "read"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: String,
    pub ip: String,
    pub user_agent: String,
    pub path: String,
    pub referrer: String,
    pub country: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Visitor {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            ip: field::text(&doc.data, "ip"),
            user_agent: field::text(&doc.data, "user_agent"),
            path: field::text(&doc.data, "path"),
            referrer: field::text(&doc.data, "referrer"),
            country: field::text(&doc.data, "country"),
            city: field::text(&doc.data, "city"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestBookMessage {
    pub id: String,
    pub name: String,
    pub message: String,
    pub website: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuestBookMessage {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: field::text(&doc.data, "name"),
            message: field::text(&doc.data, "message"),
            website: field::text(&doc.data, "website"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Key/value/description triple forming an un-typed configuration store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    pub id: String,
    pub key: String,
    pub value: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SiteSetting {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            key: field::text(&doc.data, "key"),
            value: field::text(&doc.data, "value"),
            description: field::text(&doc.data, "description"),
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
    fn test_contact_submission_defaults_unread() {
        let submission = ContactSubmission::from_doc(&doc(
            "c1",
            json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi" }),
        ));
        assert!(!submission.read);
        assert_eq!(submission.subject, "");
    }

    #[test]
    fn test_visitor_geo_fields_default_empty() {
        let visitor = Visitor::from_doc(&doc("v1", json!({ "ip": "203.0.113.7", "path": "/" })));
        assert_eq!(visitor.country, "");
        assert_eq!(visitor.city, "");
    }

    #[test]
    fn test_site_setting_triple() {
        let setting = SiteSetting::from_doc(&doc(
            "s1",
            json!({ "key": "site_title", "value": "devfolio", "description": "Shown in header" }),
        ));
        assert_eq!(setting.key, "site_title");
        assert_eq!(setting.value, "devfolio");
    }
}
