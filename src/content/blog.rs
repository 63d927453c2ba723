/**
 * Blog Entities
 * Posts, series, and comments. Post reading time is derived from content
 * at map time when the document does not carry an explicit estimate.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::attachment::ImageRef;
use crate::content::{field, reading};
use crate::db::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "published" => PostStatus::Published,
            _ => PostStatus::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// Unique, used for public routing.
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: ImageRef,
    pub date: String,
    pub reading_time: String,
    pub category_ids: Vec<String>,
    pub tag_ids: Vec<String>,
    pub technology_ids: Vec<String>,
    pub status: PostStatus,
    pub featured: bool,
    pub series_id: String,
    pub series_position: i64,
    pub related_post_ids: Vec<String>,
    pub recommended_next_read_id: String,
    pub read_count: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn from_doc(doc: &Document) -> Self {
        let content = field::text(&doc.data, "content");
        let reading_time = {
            let explicit = field::text(&doc.data, "reading_time");
            if explicit.is_empty() {
                reading::reading_time(&content)
            } else {
                explicit
            }
        };

        Self {
            id: doc.id.clone(),
            title: field::text(&doc.data, "title"),
            slug: field::text(&doc.data, "slug"),
            excerpt: field::text(&doc.data, "excerpt"),
            cover_image: ImageRef::from_field(&doc.data, "cover_image_id"),
            date: field::text(&doc.data, "date"),
            reading_time,
            content,
            category_ids: field::text_list(&doc.data, "category_ids"),
            tag_ids: field::text_list(&doc.data, "tag_ids"),
            technology_ids: field::text_list(&doc.data, "technology_ids"),
            status: PostStatus::parse(&field::text(&doc.data, "status")),
            featured: field::flag(&doc.data, "featured"),
            series_id: field::text(&doc.data, "series_id"),
            series_position: field::integer(&doc.data, "series_position"),
            related_post_ids: field::text_list(&doc.data, "related_post_ids"),
            recommended_next_read_id: field::text(&doc.data, "recommended_next_read_id"),
            read_count: field::integer(&doc.data, "read_count"),
            likes: field::integer(&doc.data, "likes"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    Ongoing,
    Complete,
}

impl SeriesStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "complete" => SeriesStatus::Complete,
            _ => SeriesStatus::Ongoing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSeries {
    pub id: String,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub image: ImageRef,
    pub status: SeriesStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogSeries {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: field::text(&doc.data, "title"),
            description: field::text(&doc.data, "description"),
            slug: field::text(&doc.data, "slug"),
            image: ImageRef::from_field(&doc.data, "image_id"),
            status: SeriesStatus::parse(&field::text(&doc.data, "status")),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    /// The content item (post, project, ...) the comment is attached to.
    pub content_id: String,
    pub author_name: String,
    pub author_email: String,
    pub text: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_doc(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            content_id: field::text(&doc.data, "content_id"),
            author_name: field::text(&doc.data, "author_name"),
            author_email: field::text(&doc.data, "author_email"),
            text: field::text(&doc.data, "text"),
            likes: field::integer(&doc.data, "likes"),
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
    fn test_post_defaults_for_minimal_document() {
        let post = BlogPost::from_doc(&doc("p1", json!({ "title": "Hello", "slug": "hello" })));
        assert_eq!(post.title, "Hello");
        assert_eq!(post.status, PostStatus::Draft);
        assert!(!post.featured);
        assert_eq!(post.read_count, 0);
        assert_eq!(post.likes, 0);
        assert_eq!(post.series_id, "");
        assert_eq!(post.series_position, 0);
        assert!(post.related_post_ids.is_empty());
        assert!(post.cover_image.is_placeholder());
        // Empty content still maps, with a zero-minute estimate.
        assert_eq!(post.reading_time, "0 min read");
    }

    #[test]
    fn test_post_reading_time_derived_when_absent() {
        let content = vec!["word"; 300].join(" ");
        let post = BlogPost::from_doc(&doc("p1", json!({ "slug": "x", "content": content })));
        assert_eq!(post.reading_time, "2 min read");
    }

    #[test]
    fn test_post_explicit_reading_time_wins() {
        let post = BlogPost::from_doc(&doc(
            "p1",
            json!({ "slug": "x", "content": "short", "reading_time": "7 min read" }),
        ));
        assert_eq!(post.reading_time, "7 min read");
    }

    #[test]
    fn test_post_status_parse() {
        assert_eq!(PostStatus::parse("published"), PostStatus::Published);
        assert_eq!(PostStatus::parse("Published"), PostStatus::Published);
        assert_eq!(PostStatus::parse("draft"), PostStatus::Draft);
        assert_eq!(PostStatus::parse("bogus"), PostStatus::Draft);
    }

    #[test]
    fn test_series_status_parse() {
        assert_eq!(SeriesStatus::parse("complete"), SeriesStatus::Complete);
        assert_eq!(SeriesStatus::parse("ongoing"), SeriesStatus::Ongoing);
        assert_eq!(SeriesStatus::parse(""), SeriesStatus::Ongoing);
    }

    #[test]
    fn test_comment_maps_content_reference() {
        let comment = Comment::from_doc(&doc(
            "c1",
            json!({ "content_id": "p1", "author_name": "Ada", "text": "Nice", "likes": 3 }),
        ));
        assert_eq!(comment.content_id, "p1");
        assert_eq!(comment.likes, 3);
        assert_eq!(comment.author_email, "");
    }
}
