/**
 * Profile Entities
 * The singleton site profile, social links, and /uses items.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::attachment::ImageRef;
use crate::content::field;
use crate::db::store::Document;

/// Singleton: exactly one profile document is expected to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub nickname: String,
    pub title: String,
    pub bio_short: String,
    pub bio_long: String,
    pub location: String,
    pub avatar: ImageRef,
    pub cover_image: ImageRef,
    pub resume_url: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            full_name: field::text(&doc.data, "full_name"),
            nickname: field::text(&doc.data, "nickname"),
            title: field::text(&doc.data, "title"),
            bio_short: field::text(&doc.data, "bio_short"),
            bio_long: field::text(&doc.data, "bio_long"),
            location: field::text(&doc.data, "location"),
            avatar: ImageRef::from_field(&doc.data, "avatar_id"),
            cover_image: ImageRef::from_field(&doc.data, "cover_image_id"),
            resume_url: field::text(&doc.data, "resume_url"),
            meta_description: field::text(&doc.data, "meta_description"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub icon: String,
    pub priority: i64,
    /// Gate for public display; defaults to visible when absent.
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SocialLink {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            platform: field::text(&doc.data, "platform"),
            url: field::text(&doc.data, "url"),
            icon: field::text(&doc.data, "icon"),
            priority: field::integer(&doc.data, "priority"),
            is_visible: field::flag_or(&doc.data, "is_visible", true),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsesItem {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: String,
    pub link: String,
    pub image: ImageRef,
    pub is_favorite: bool,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UsesItem {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            category_id: field::text(&doc.data, "category_id"),
            name: field::text(&doc.data, "name"),
            description: field::text(&doc.data, "description"),
            link: field::text(&doc.data, "link"),
            image: ImageRef::from_field(&doc.data, "image_id"),
            is_favorite: field::flag(&doc.data, "is_favorite"),
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
    fn test_profile_defaults() {
        let profile = Profile::from_doc(&doc("me", json!({ "full_name": "Ada Lovelace" })));
        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.nickname, "");
        assert!(profile.avatar.is_placeholder());
        assert!(profile.cover_image.is_placeholder());
    }

    #[test]
    fn test_social_link_visibility_defaults_true() {
        let link = SocialLink::from_doc(&doc("s1", json!({ "platform": "github" })));
        assert!(link.is_visible);

        let hidden = SocialLink::from_doc(&doc(
            "s2",
            json!({ "platform": "x", "is_visible": false }),
        ));
        assert!(!hidden.is_visible);
    }

    #[test]
    fn test_uses_item_defaults() {
        let item = UsesItem::from_doc(&doc("u1", json!({ "name": "Helix" })));
        assert!(!item.is_favorite);
        assert_eq!(item.priority, 0);
        assert!(item.image.is_placeholder());
    }
}
