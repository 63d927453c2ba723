/**
 * Taxonomy Routes
 * CRUD for categories, technologies, and skills, plus the public
 * technologies-grouped-by-category view.
 */
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::content::collections;
use crate::content::fetch;
use crate::content::taxonomy::{would_form_cycle, Category, Skill, Technology};
use crate::content::views;
use crate::db::store;
use crate::routes::auth::verify_auth;
use crate::routes::{bad_request, store_error, SuccessResponse};

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

/// Arena of id -> parent_id pointers for the cycle check on writes.
async fn category_parents() -> Result<HashMap<String, String>, store::StoreError> {
    let categories =
        fetch::collection_strict(collections::CATEGORIES, Category::from_doc).await?;
    Ok(categories
        .into_iter()
        .map(|c| (c.id, c.parent_id))
        .collect())
}

/// GET /api/categories
pub async fn list_categories() -> impl IntoResponse {
    let categories = fetch::collection(collections::CATEGORIES, Category::from_doc).await;
    Json(categories)
}

/// POST /api/categories (auth required)
pub async fn create_category(
    headers: HeaderMap,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.name.trim().is_empty() {
        return bad_request("Name is required").into_response();
    }

    let parent_id = payload.parent_id.unwrap_or_default();
    if !parent_id.is_empty() {
        let parents = match category_parents().await {
            Ok(parents) => parents,
            Err(e) => return store_error(e, "checking category parents").into_response(),
        };
        // A fresh id cannot appear in the chain, but a corrupt chain must
        // still terminate the walk.
        if would_form_cycle("", &parent_id, &parents) {
            return bad_request("Parent assignment would form a cycle").into_response();
        }
    }

    let data = json!({
        "name": payload.name,
        "description": payload.description.unwrap_or_default(),
        "parent_id": parent_id,
    });

    match store::create(collections::CATEGORIES, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Category::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating category").into_response(),
    }
}

/// PATCH /api/categories/{id} (auth required)
pub async fn update_category(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if let Some(parent_id) = payload.parent_id.as_deref().filter(|p| !p.is_empty()) {
        let parents = match category_parents().await {
            Ok(parents) => parents,
            Err(e) => return store_error(e, "checking category parents").into_response(),
        };
        if would_form_cycle(&id, parent_id, &parents) {
            return bad_request("Parent assignment would form a cycle").into_response();
        }
    }

    let mut patch = serde_json::Map::new();
    if let Some(name) = payload.name {
        patch.insert("name".to_string(), json!(name));
    }
    if let Some(description) = payload.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(parent_id) = payload.parent_id {
        patch.insert("parent_id".to_string(), json!(parent_id));
    }

    match store::update(collections::CATEGORIES, &id, patch.into()).await {
        Ok(doc) => Json(Category::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating category").into_response(),
    }
}

/// DELETE /api/categories/{id} (auth required)
/// Deliberately does not cascade: entities referencing the category keep
/// their identifier and resolve to a fallback label.
pub async fn delete_category(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::CATEGORIES, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting category").into_response(),
    }
}

// ============================================================================
// Technologies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTechnologyRequest {
    pub name: String,
    pub category_id: String,
    pub icon: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTechnologyRequest {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub icon: Option<String>,
    pub website: Option<String>,
}

/// GET /api/technologies
pub async fn list_technologies() -> impl IntoResponse {
    let technologies = fetch::collection(collections::TECHNOLOGIES, Technology::from_doc).await;
    Json(technologies)
}

/// GET /api/technologies/grouped
/// Grouped by resolved category name; a degraded categories fetch falls
/// back to grouping by the raw identifiers.
pub async fn grouped_technologies() -> impl IntoResponse {
    let (technologies, categories) = tokio::join!(
        fetch::collection(collections::TECHNOLOGIES, Technology::from_doc),
        fetch::collection(collections::CATEGORIES, Category::from_doc),
    );
    Json(views::technologies_by_category(&technologies, &categories))
}

/// POST /api/technologies (auth required)
pub async fn create_technology(
    headers: HeaderMap,
    Json(payload): Json<CreateTechnologyRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.name.trim().is_empty() {
        return bad_request("Name is required").into_response();
    }

    let data = json!({
        "name": payload.name,
        "category_id": payload.category_id,
        "icon": payload.icon.unwrap_or_default(),
        "website": payload.website.unwrap_or_default(),
    });

    match store::create(collections::TECHNOLOGIES, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Technology::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating technology").into_response(),
    }
}

/// PATCH /api/technologies/{id} (auth required)
pub async fn update_technology(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTechnologyRequest>,
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
    if let Some(icon) = payload.icon {
        patch.insert("icon".to_string(), json!(icon));
    }
    if let Some(website) = payload.website {
        patch.insert("website".to_string(), json!(website));
    }

    match store::update(collections::TECHNOLOGIES, &id, patch.into()).await {
        Ok(doc) => Json(Technology::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating technology").into_response(),
    }
}

/// DELETE /api/technologies/{id} (auth required)
pub async fn delete_technology(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::TECHNOLOGIES, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting technology").into_response(),
    }
}

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    pub name: String,
    pub category_id: Option<String>,
    pub technology_id: Option<String>,
    pub level: Option<String>,
    pub years: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub technology_id: Option<String>,
    pub level: Option<String>,
    pub years: Option<f64>,
}

/// GET /api/skills
pub async fn list_skills() -> impl IntoResponse {
    let skills = fetch::collection(collections::SKILLS, Skill::from_doc).await;
    Json(skills)
}

/// POST /api/skills (auth required)
pub async fn create_skill(
    headers: HeaderMap,
    Json(payload): Json<CreateSkillRequest>,
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
        "technology_id": payload.technology_id.unwrap_or_default(),
        "level": payload.level.unwrap_or_else(|| "Beginner".to_string()),
        "years": payload.years.unwrap_or(0.0),
    });

    match store::create(collections::SKILLS, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Skill::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating skill").into_response(),
    }
}

/// PATCH /api/skills/{id} (auth required)
pub async fn update_skill(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSkillRequest>,
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
    if let Some(technology_id) = payload.technology_id {
        patch.insert("technology_id".to_string(), json!(technology_id));
    }
    if let Some(level) = payload.level {
        patch.insert("level".to_string(), json!(level));
    }
    if let Some(years) = payload.years {
        patch.insert("years".to_string(), json!(years));
    }

    match store::update(collections::SKILLS, &id, patch.into()).await {
        Ok(doc) => Json(Skill::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating skill").into_response(),
    }
}

/// DELETE /api/skills/{id} (auth required)
pub async fn delete_skill(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::SKILLS, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting skill").into_response(),
    }
}
