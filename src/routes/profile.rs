/**
 * Profile Routes
 * The singleton site profile, social links, and /uses items.
 */
use axum::{
    extract::{Multipart, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::content::collections;
use crate::content::fetch;
use crate::content::profile::{Profile, SocialLink, UsesItem};
use crate::content::views;
use crate::db::store;
use crate::routes::auth::verify_auth;
use crate::routes::media::replace_attachment;
use crate::routes::{bad_request, store_error, SuccessResponse};

/// Fixed document id for the singleton profile.
const PROFILE_ID: &str = "profile";

// ============================================================================
// Profile
// ============================================================================

/// Response for GET /api/profile: `data` is null when no profile document
/// exists yet.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub data: Option<Profile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub nickname: Option<String>,
    pub title: Option<String>,
    pub bio_short: Option<String>,
    pub bio_long: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub meta_description: Option<String>,
}

/// GET /api/profile
pub async fn get_profile() -> impl IntoResponse {
    match fetch::by_id(collections::PROFILE, PROFILE_ID, Profile::from_doc).await {
        Ok(profile) => Json(ProfileResponse { data: profile }).into_response(),
        Err(e) => store_error(e, "fetching profile").into_response(),
    }
}

/// PUT /api/profile (auth required)
/// Upserts the singleton document.
pub async fn update_profile(
    headers: HeaderMap,
    Json(payload): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(full_name) = payload.full_name {
        patch.insert("full_name".to_string(), json!(full_name));
    }
    if let Some(nickname) = payload.nickname {
        patch.insert("nickname".to_string(), json!(nickname));
    }
    if let Some(title) = payload.title {
        patch.insert("title".to_string(), json!(title));
    }
    if let Some(bio_short) = payload.bio_short {
        patch.insert("bio_short".to_string(), json!(bio_short));
    }
    if let Some(bio_long) = payload.bio_long {
        patch.insert("bio_long".to_string(), json!(bio_long));
    }
    if let Some(location) = payload.location {
        patch.insert("location".to_string(), json!(location));
    }
    if let Some(resume_url) = payload.resume_url {
        patch.insert("resume_url".to_string(), json!(resume_url));
    }
    if let Some(meta_description) = payload.meta_description {
        patch.insert("meta_description".to_string(), json!(meta_description));
    }

    let existing = match store::get(collections::PROFILE, PROFILE_ID).await {
        Ok(existing) => existing,
        Err(e) => return store_error(e, "fetching profile").into_response(),
    };

    let result = match existing {
        Some(_) => store::update(collections::PROFILE, PROFILE_ID, patch.into()).await,
        None => {
            store::create(
                collections::PROFILE,
                Some(PROFILE_ID.to_string()),
                patch.into(),
            )
            .await
        }
    };

    match result {
        Ok(doc) => Json(Profile::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating profile").into_response(),
    }
}

/// PUT /api/profile/avatar (auth required, multipart)
pub async fn replace_avatar(headers: HeaderMap, multipart: Multipart) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match replace_attachment(collections::PROFILE, PROFILE_ID, "avatar_id", multipart).await {
        Ok(image) => Json(image).into_response(),
        Err(err_response) => err_response.into_response(),
    }
}

/// PUT /api/profile/cover (auth required, multipart)
pub async fn replace_cover(headers: HeaderMap, multipart: Multipart) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match replace_attachment(
        collections::PROFILE,
        PROFILE_ID,
        "cover_image_id",
        multipart,
    )
    .await
    {
        Ok(image) => Json(image).into_response(),
        Err(err_response) => err_response.into_response(),
    }
}

// ============================================================================
// Social Links
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSocialLinkRequest {
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
    pub priority: Option<i64>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSocialLinkRequest {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub priority: Option<i64>,
    pub is_visible: Option<bool>,
}

/// GET /api/social - visible links only, ascending by priority
pub async fn list_social_links() -> impl IntoResponse {
    let links = fetch::collection(collections::SOCIAL_LINKS, SocialLink::from_doc).await;
    Json(views::visible_social_links(&links))
}

/// GET /api/social/all (auth required) - admin listing including hidden
pub async fn list_all_social_links(headers: HeaderMap) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let links = fetch::collection(collections::SOCIAL_LINKS, SocialLink::from_doc).await;
    Json(links).into_response()
}

/// POST /api/social (auth required)
pub async fn create_social_link(
    headers: HeaderMap,
    Json(payload): Json<CreateSocialLinkRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.platform.trim().is_empty() || payload.url.trim().is_empty() {
        return bad_request("Platform and url are required").into_response();
    }

    let data = json!({
        "platform": payload.platform,
        "url": payload.url,
        "icon": payload.icon.unwrap_or_default(),
        "priority": payload.priority.unwrap_or(0),
        "is_visible": payload.is_visible.unwrap_or(true),
    });

    match store::create(collections::SOCIAL_LINKS, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(SocialLink::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating social link").into_response(),
    }
}

/// PATCH /api/social/{id} (auth required)
pub async fn update_social_link(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSocialLinkRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(platform) = payload.platform {
        patch.insert("platform".to_string(), json!(platform));
    }
    if let Some(url) = payload.url {
        patch.insert("url".to_string(), json!(url));
    }
    if let Some(icon) = payload.icon {
        patch.insert("icon".to_string(), json!(icon));
    }
    if let Some(priority) = payload.priority {
        patch.insert("priority".to_string(), json!(priority));
    }
    if let Some(is_visible) = payload.is_visible {
        patch.insert("is_visible".to_string(), json!(is_visible));
    }

    match store::update(collections::SOCIAL_LINKS, &id, patch.into()).await {
        Ok(doc) => Json(SocialLink::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating social link").into_response(),
    }
}

/// DELETE /api/social/{id} (auth required)
pub async fn delete_social_link(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::SOCIAL_LINKS, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting social link").into_response(),
    }
}

// ============================================================================
// Uses Items
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UsesListQuery {
    pub favorites: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsesItemRequest {
    pub name: String,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_id: Option<String>,
    pub is_favorite: Option<bool>,
    pub priority: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsesItemRequest {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub is_favorite: Option<bool>,
    pub priority: Option<i64>,
}

/// GET /api/uses - priority-sorted, optionally favorites only
pub async fn list_uses(Query(query): Query<UsesListQuery>) -> impl IntoResponse {
    let items = fetch::collection(collections::USES_ITEMS, UsesItem::from_doc).await;
    if query.favorites.unwrap_or(false) {
        Json(views::favorite_uses(&items))
    } else {
        Json(views::uses_sorted(&items))
    }
}

/// POST /api/uses (auth required)
pub async fn create_uses_item(
    headers: HeaderMap,
    Json(payload): Json<CreateUsesItemRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.name.trim().is_empty() {
        return bad_request("Name is required").into_response();
    }

    let data = json!({
        "name": payload.name,
        "category_id": payload.category_id.unwrap_or_default(),
        "description": payload.description.unwrap_or_default(),
        "link": payload.link.unwrap_or_default(),
        "image_id": payload.image_id.unwrap_or_default(),
        "is_favorite": payload.is_favorite.unwrap_or(false),
        "priority": payload.priority.unwrap_or(0),
    });

    match store::create(collections::USES_ITEMS, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(UsesItem::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating uses item").into_response(),
    }
}

/// PATCH /api/uses/{id} (auth required)
pub async fn update_uses_item(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUsesItemRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(name) = payload.name {
        patch.insert("name".to_string(), json!(name));
    }
    if let Some(category_id) = payload.category_id {
        patch.insert("category_id".to_string(), json!(category_id));
    }
    if let Some(description) = payload.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(link) = payload.link {
        patch.insert("link".to_string(), json!(link));
    }
    if let Some(is_favorite) = payload.is_favorite {
        patch.insert("is_favorite".to_string(), json!(is_favorite));
    }
    if let Some(priority) = payload.priority {
        patch.insert("priority".to_string(), json!(priority));
    }

    match store::update(collections::USES_ITEMS, &id, patch.into()).await {
        Ok(doc) => Json(UsesItem::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating uses item").into_response(),
    }
}

/// PUT /api/uses/{id}/image (auth required, multipart)
pub async fn replace_uses_image(
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match replace_attachment(collections::USES_ITEMS, &id, "image_id", multipart).await {
        Ok(image) => Json(image).into_response(),
        Err(err_response) => err_response.into_response(),
    }
}

/// DELETE /api/uses/{id} (auth required)
pub async fn delete_uses_item(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::USES_ITEMS, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting uses item").into_response(),
    }
}
