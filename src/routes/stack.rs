/**
 * Tech Stack Routes
 * CRUD for current-tech-stack records and the composed home-page section
 * with category and technology objects inlined.
 */
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::content::collections;
use crate::content::fetch;
use crate::content::taxonomy::{Category, CurrentTechStack, Technology};
use crate::content::views;
use crate::db::store;
use crate::routes::auth::verify_auth;
use crate::routes::{bad_request, store_error, SuccessResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStackRequest {
    pub name: String,
    pub category_id: String,
    pub technology_ids: Option<Vec<String>>,
    pub priority: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStackRequest {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub technology_ids: Option<Vec<String>>,
    pub priority: Option<i64>,
}

/// GET /api/stack
/// The three collections are fetched concurrently and joined; if any one
/// fetch fails the whole view is rejected rather than rendered partially.
pub async fn stack_section() -> impl IntoResponse {
    let joined = tokio::try_join!(
        fetch::collection_strict(collections::TECH_STACK, CurrentTechStack::from_doc),
        fetch::collection_strict(collections::CATEGORIES, Category::from_doc),
        fetch::collection_strict(collections::TECHNOLOGIES, Technology::from_doc),
    );

    match joined {
        Ok((stack, categories, technologies)) => {
            Json(views::current_stack_details(&stack, &categories, &technologies)).into_response()
        }
        Err(e) => store_error(e, "composing tech stack section").into_response(),
    }
}

/// GET /api/stack/entries (admin listing, raw records)
pub async fn list_entries() -> impl IntoResponse {
    let entries = fetch::collection(collections::TECH_STACK, CurrentTechStack::from_doc).await;
    Json(entries)
}

/// POST /api/stack/entries (auth required)
pub async fn create_entry(
    headers: HeaderMap,
    Json(payload): Json<CreateStackRequest>,
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
        "technology_ids": payload.technology_ids.unwrap_or_default(),
        "priority": payload.priority.unwrap_or(0),
    });

    match store::create(collections::TECH_STACK, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(CurrentTechStack::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating tech stack entry").into_response(),
    }
}

/// PATCH /api/stack/entries/{id} (auth required)
pub async fn update_entry(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStackRequest>,
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
    if let Some(technology_ids) = payload.technology_ids {
        patch.insert("technology_ids".to_string(), json!(technology_ids));
    }
    if let Some(priority) = payload.priority {
        patch.insert("priority".to_string(), json!(priority));
    }

    match store::update(collections::TECH_STACK, &id, patch.into()).await {
        Ok(doc) => Json(CurrentTechStack::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating tech stack entry").into_response(),
    }
}

/// DELETE /api/stack/entries/{id} (auth required)
pub async fn delete_entry(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::TECH_STACK, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting tech stack entry").into_response(),
    }
}
