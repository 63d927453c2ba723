/**
 * Blog Routes
 * CRUD API endpoints for blog posts, series, and comments
 */
use axum::{
    extract::{Multipart, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::content::blog::{BlogPost, BlogSeries, Comment, PostStatus};
use crate::content::collections;
use crate::content::fetch;
use crate::content::{reading, views};
use crate::db::store::{self, ListQuery, Order};
use crate::routes::auth::verify_auth;
use crate::routes::media::replace_attachment;
use crate::routes::{bad_request, not_found, store_error, ErrorResponse, SuccessResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for GET /api/blog (list)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<String>,
    pub featured: Option<bool>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// Response for GET /api/blog (list)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListResponse {
    pub items: Vec<BlogPost>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Request body for POST /api/blog (create)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image_id: Option<String>,
    pub date: Option<String>,
    pub reading_time: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub tag_ids: Option<Vec<String>>,
    pub technology_ids: Option<Vec<String>>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub series_id: Option<String>,
    pub series_position: Option<i64>,
    pub related_post_ids: Option<Vec<String>>,
    pub recommended_next_read_id: Option<String>,
}

/// Request body for PATCH /api/blog/{id} (update)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub date: Option<String>,
    pub reading_time: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub tag_ids: Option<Vec<String>>,
    pub technology_ids: Option<Vec<String>>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub series_id: Option<String>,
    pub series_position: Option<i64>,
    pub related_post_ids: Option<Vec<String>>,
    pub recommended_next_read_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}

/// Response for GET /api/series/{slug}: `data` is null when the slug does
/// not resolve, mirroring the absent-not-error contract of this lookup.
#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub data: Option<views::SeriesWithPosts>,
}

// ============================================================================
// Validation
// ============================================================================

lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

async fn post_by_slug(slug: &str) -> Result<Option<BlogPost>, store::StoreError> {
    fetch::first(
        collections::POSTS,
        &ListQuery::new().equals("slug", slug),
        BlogPost::from_doc,
    )
    .await
}

// ============================================================================
// Post Handlers
// ============================================================================

/// GET /api/blog - List blog posts with pagination
pub async fn list_posts(Query(query): Query<BlogListQuery>) -> impl IntoResponse {
    // Clamp page_size to max 100
    let page_size = query.page_size.clamp(1, 100);
    let page = query.page.max(1);
    let offset = (page - 1) * page_size;

    let mut list_query = ListQuery::new().order_by("date", Order::Desc);
    let mut count_query = ListQuery::new();
    if let Some(status) = &query.status {
        list_query = list_query.equals("status", status.as_str());
        count_query = count_query.equals("status", status.as_str());
    }
    if let Some(featured) = query.featured {
        list_query = list_query.equals("featured", featured);
        count_query = count_query.equals("featured", featured);
    }
    list_query = list_query.limit(page_size).offset(offset);

    let items = fetch::filtered(collections::POSTS, &list_query, BlogPost::from_doc).await;
    let total = store::count(collections::POSTS, &count_query)
        .await
        .unwrap_or(0);

    Json(BlogListResponse {
        items,
        page,
        page_size,
        total,
    })
}

/// GET /api/blog/{slug} - Get single blog post by slug
/// Bumps the read counter best-effort; a failed bump never fails the read.
pub async fn get_post(Path(slug): Path<String>) -> impl IntoResponse {
    if !is_valid_slug(&slug) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_message(
                "Invalid slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            )),
        )
            .into_response();
    }

    let mut post = match post_by_slug(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching blog post").into_response(),
    };

    let bumped = post.read_count + 1;
    match store::update(collections::POSTS, &post.id, json!({ "read_count": bumped })).await {
        Ok(_) => post.read_count = bumped,
        Err(e) => tracing::warn!("Failed to bump read count for {}: {}", post.id, e),
    }

    Json(post).into_response()
}

/// GET /api/blog/{slug}/navigation - Related posts and the recommended
/// next read, resolved against published posts.
pub async fn get_post_navigation(Path(slug): Path<String>) -> impl IntoResponse {
    let post = match post_by_slug(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching blog post").into_response(),
    };

    let published = fetch::filtered(
        collections::POSTS,
        &ListQuery::new().equals("status", PostStatus::Published.as_str()),
        BlogPost::from_doc,
    )
    .await;

    Json(views::post_navigation(&post, &published)).into_response()
}

/// POST /api/blog/{slug}/like
pub async fn like_post(Path(slug): Path<String>) -> impl IntoResponse {
    let post = match post_by_slug(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching blog post").into_response(),
    };

    let likes = post.likes + 1;
    match store::update(collections::POSTS, &post.id, json!({ "likes": likes })).await {
        Ok(_) => Json(LikeResponse { likes }).into_response(),
        Err(e) => store_error(e, "liking blog post").into_response(),
    }
}

/// POST /api/blog - Create new blog post (auth required)
pub async fn create_post(
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.title.trim().is_empty() {
        return bad_request("Title is required").into_response();
    }
    if payload.slug.trim().is_empty() {
        return bad_request("Slug is required").into_response();
    }
    if !is_valid_slug(&payload.slug) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_message(
                "Invalid slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            )),
        )
            .into_response();
    }

    // Slug is the public route key; duplicates are a conflict.
    match post_by_slug(&payload.slug).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse::new("Slug already exists")),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => return store_error(e, "checking slug uniqueness").into_response(),
    }

    let content = payload.content.unwrap_or_default();
    let reading_time = payload
        .reading_time
        .unwrap_or_else(|| reading::reading_time(&content));

    let data = json!({
        "title": payload.title,
        "slug": payload.slug,
        "excerpt": payload.excerpt.unwrap_or_default(),
        "content": content,
        "cover_image_id": payload.cover_image_id.unwrap_or_default(),
        "date": payload.date.unwrap_or_default(),
        "reading_time": reading_time,
        "category_ids": payload.category_ids.unwrap_or_default(),
        "tag_ids": payload.tag_ids.unwrap_or_default(),
        "technology_ids": payload.technology_ids.unwrap_or_default(),
        "status": PostStatus::parse(&payload.status.unwrap_or_default()).as_str(),
        "featured": payload.featured.unwrap_or(false),
        "series_id": payload.series_id.unwrap_or_default(),
        "series_position": payload.series_position.unwrap_or(0),
        "related_post_ids": payload.related_post_ids.unwrap_or_default(),
        "recommended_next_read_id": payload.recommended_next_read_id.unwrap_or_default(),
        "read_count": 0,
        "likes": 0,
    });

    match store::create(collections::POSTS, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(BlogPost::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating blog post").into_response(),
    }
}

/// PATCH /api/blog/{id} - Update blog post (auth required)
pub async fn update_post(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if let Some(slug) = &payload.slug {
        if !is_valid_slug(slug) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "Invalid slug",
                    "Slug must contain only lowercase letters, numbers, and hyphens",
                )),
            )
                .into_response();
        }
        match post_by_slug(slug).await {
            Ok(Some(existing)) if existing.id != id => {
                return (
                    StatusCode::CONFLICT,
                    Json(ErrorResponse::new("Slug already exists")),
                )
                    .into_response();
            }
            Ok(_) => {}
            Err(e) => return store_error(e, "checking slug uniqueness").into_response(),
        }
    }

    let mut patch = serde_json::Map::new();
    if let Some(title) = payload.title {
        patch.insert("title".to_string(), json!(title));
    }
    if let Some(slug) = payload.slug {
        patch.insert("slug".to_string(), json!(slug));
    }
    if let Some(excerpt) = payload.excerpt {
        patch.insert("excerpt".to_string(), json!(excerpt));
    }
    if let Some(content) = &payload.content {
        patch.insert("content".to_string(), json!(content));
        // Changed content invalidates a derived estimate; an explicit one
        // in the same request still wins below.
        patch.insert(
            "reading_time".to_string(),
            json!(reading::reading_time(content)),
        );
    }
    if let Some(reading_time) = payload.reading_time {
        patch.insert("reading_time".to_string(), json!(reading_time));
    }
    if let Some(date) = payload.date {
        patch.insert("date".to_string(), json!(date));
    }
    if let Some(category_ids) = payload.category_ids {
        patch.insert("category_ids".to_string(), json!(category_ids));
    }
    if let Some(tag_ids) = payload.tag_ids {
        patch.insert("tag_ids".to_string(), json!(tag_ids));
    }
    if let Some(technology_ids) = payload.technology_ids {
        patch.insert("technology_ids".to_string(), json!(technology_ids));
    }
    if let Some(status) = payload.status {
        patch.insert("status".to_string(), json!(PostStatus::parse(&status).as_str()));
    }
    if let Some(featured) = payload.featured {
        patch.insert("featured".to_string(), json!(featured));
    }
    if let Some(series_id) = payload.series_id {
        patch.insert("series_id".to_string(), json!(series_id));
    }
    if let Some(series_position) = payload.series_position {
        patch.insert("series_position".to_string(), json!(series_position));
    }
    if let Some(related_post_ids) = payload.related_post_ids {
        patch.insert("related_post_ids".to_string(), json!(related_post_ids));
    }
    if let Some(recommended) = payload.recommended_next_read_id {
        patch.insert("recommended_next_read_id".to_string(), json!(recommended));
    }

    match store::update(collections::POSTS, &id, patch.into()).await {
        Ok(doc) => Json(BlogPost::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating blog post").into_response(),
    }
}

/// PUT /api/blog/{id}/cover (auth required, multipart)
pub async fn replace_post_cover(
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match replace_attachment(collections::POSTS, &id, "cover_image_id", multipart).await {
        Ok(image) => Json(image).into_response(),
        Err(err_response) => err_response.into_response(),
    }
}

/// DELETE /api/blog/{id} - Delete blog post (auth required)
pub async fn delete_post(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let post = match fetch::by_id(collections::POSTS, &id, BlogPost::from_doc).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching blog post").into_response(),
    };

    match store::delete(collections::POSTS, &id).await {
        Ok(()) => {
            if !post.cover_image.is_placeholder() {
                if let Err(e) = crate::storage::media().delete(&post.cover_image.id).await {
                    tracing::warn!(
                        "Failed to delete cover {} of post {}: {}",
                        post.cover_image.id,
                        id,
                        e
                    );
                }
            }
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => store_error(e, "deleting blog post").into_response(),
    }
}

// ============================================================================
// Series Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeriesRequest {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSeriesRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// GET /api/series
pub async fn list_series() -> impl IntoResponse {
    let series = fetch::collection(collections::SERIES, BlogSeries::from_doc).await;
    Json(series)
}

/// GET /api/series/{slug} - Series with its posts ordered by position and
/// the summed reading time. An unknown slug is a null `data`, not a 404.
pub async fn get_series(Path(slug): Path<String>) -> impl IntoResponse {
    let series = match fetch::first(
        collections::SERIES,
        &ListQuery::new().equals("slug", slug.as_str()),
        BlogSeries::from_doc,
    )
    .await
    {
        Ok(Some(series)) => series,
        Ok(None) => return Json(SeriesResponse { data: None }).into_response(),
        Err(e) => return store_error(e, "fetching series").into_response(),
    };

    let posts = fetch::filtered(
        collections::POSTS,
        &ListQuery::new().equals("series_id", series.id.as_str()),
        BlogPost::from_doc,
    )
    .await;

    Json(SeriesResponse {
        data: Some(views::series_with_posts(&series, &posts)),
    })
    .into_response()
}

/// POST /api/series (auth required)
pub async fn create_series(
    headers: HeaderMap,
    Json(payload): Json<CreateSeriesRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.title.trim().is_empty() {
        return bad_request("Title is required").into_response();
    }
    if !is_valid_slug(&payload.slug) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_message(
                "Invalid slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            )),
        )
            .into_response();
    }

    let data = json!({
        "title": payload.title,
        "slug": payload.slug,
        "description": payload.description.unwrap_or_default(),
        "image_id": payload.image_id.unwrap_or_default(),
        "status": payload.status.unwrap_or_else(|| "ongoing".to_string()),
    });

    match store::create(collections::SERIES, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(BlogSeries::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating series").into_response(),
    }
}

/// PATCH /api/series/{id} (auth required)
pub async fn update_series(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSeriesRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if let Some(slug) = &payload.slug {
        if !is_valid_slug(slug) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "Invalid slug",
                    "Slug must contain only lowercase letters, numbers, and hyphens",
                )),
            )
                .into_response();
        }
    }

    let mut patch = serde_json::Map::new();
    if let Some(title) = payload.title {
        patch.insert("title".to_string(), json!(title));
    }
    if let Some(slug) = payload.slug {
        patch.insert("slug".to_string(), json!(slug));
    }
    if let Some(description) = payload.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(status) = payload.status {
        patch.insert("status".to_string(), json!(status));
    }

    match store::update(collections::SERIES, &id, patch.into()).await {
        Ok(doc) => Json(BlogSeries::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating series").into_response(),
    }
}

/// PUT /api/series/{id}/image (auth required, multipart)
pub async fn replace_series_image(
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match replace_attachment(collections::SERIES, &id, "image_id", multipart).await {
        Ok(image) => Json(image).into_response(),
        Err(err_response) => err_response.into_response(),
    }
}

/// DELETE /api/series/{id} (auth required)
/// Posts keep their series_id; the dangling reference resolves to nothing.
pub async fn delete_series(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::SERIES, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting series").into_response(),
    }
}

// ============================================================================
// Comment Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub content_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content_id: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub text: String,
}

/// GET /api/comments?contentId=...
pub async fn list_comments(Query(query): Query<CommentListQuery>) -> impl IntoResponse {
    let comments = fetch::filtered(
        collections::COMMENTS,
        &ListQuery::new().equals("content_id", query.content_id.as_str()),
        Comment::from_doc,
    )
    .await;
    Json(comments)
}

/// POST /api/comments - public; author-supplied text is sanitized before
/// storage
pub async fn create_comment(Json(payload): Json<CreateCommentRequest>) -> impl IntoResponse {
    if payload.content_id.trim().is_empty() {
        return bad_request("Content id is required").into_response();
    }
    if payload.author_name.trim().is_empty() || payload.text.trim().is_empty() {
        return bad_request("Name and text are required").into_response();
    }

    let data = json!({
        "content_id": payload.content_id,
        "author_name": ammonia::clean(&payload.author_name),
        "author_email": payload.author_email.unwrap_or_default(),
        "text": ammonia::clean(&payload.text),
        "likes": 0,
    });

    match store::create(collections::COMMENTS, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Comment::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating comment").into_response(),
    }
}

/// POST /api/comments/{id}/like
pub async fn like_comment(Path(id): Path<String>) -> impl IntoResponse {
    let comment = match fetch::by_id(collections::COMMENTS, &id, Comment::from_doc).await {
        Ok(Some(comment)) => comment,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching comment").into_response(),
    };

    let likes = comment.likes + 1;
    match store::update(collections::COMMENTS, &id, json!({ "likes": likes })).await {
        Ok(_) => Json(LikeResponse { likes }).into_response(),
        Err(e) => store_error(e, "liking comment").into_response(),
    }
}

/// DELETE /api/comments/{id} (auth required)
pub async fn delete_comment(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::COMMENTS, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting comment").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post-2024"));
        assert!(!is_valid_slug("Hello-World"));
        assert!(!is_valid_slug("hello_world"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug(""));
    }
}
