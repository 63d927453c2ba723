/**
 * Project Routes
 */
use axum::{
    extract::{Multipart, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::content::collections;
use crate::content::fetch;
use crate::content::project::Project;
use crate::content::taxonomy::{Category, Technology};
use crate::content::views;
use crate::db::store::{self, ListQuery};
use crate::routes::auth::verify_auth;
use crate::routes::media::replace_attachment;
use crate::routes::{bad_request, not_found, store_error, SuccessResponse};

#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub image_id: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub technology_ids: Option<Vec<String>>,
    pub github: Option<String>,
    pub live: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub technology_ids: Option<Vec<String>>,
    pub github: Option<String>,
    pub live: Option<String>,
    pub featured: Option<bool>,
}

/// GET /api/projects - optionally filtered to featured projects, with
/// reference arrays resolved to display names
pub async fn list_projects(Query(query): Query<ProjectListQuery>) -> impl IntoResponse {
    let mut list_query = ListQuery::new();
    if let Some(featured) = query.featured {
        list_query = list_query.equals("featured", featured);
    }

    let (projects, categories, technologies) = tokio::join!(
        fetch::filtered(collections::PROJECTS, &list_query, Project::from_doc),
        fetch::collection(collections::CATEGORIES, Category::from_doc),
        fetch::collection(collections::TECHNOLOGIES, Technology::from_doc),
    );

    Json(views::projects_with_names(
        &projects,
        &categories,
        &technologies,
    ))
}

/// GET /api/projects/{id}
pub async fn get_project(Path(id): Path<String>) -> impl IntoResponse {
    match fetch::by_id(collections::PROJECTS, &id, Project::from_doc).await {
        Ok(Some(project)) => Json(project).into_response(),
        Ok(None) => not_found().into_response(),
        Err(e) => store_error(e, "fetching project").into_response(),
    }
}

/// POST /api/projects (auth required)
pub async fn create_project(
    headers: HeaderMap,
    Json(payload): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.name.trim().is_empty() {
        return bad_request("Name is required").into_response();
    }

    let data = json!({
        "name": payload.name,
        "description": payload.description.unwrap_or_default(),
        "long_description": payload.long_description.unwrap_or_default(),
        "image_id": payload.image_id.unwrap_or_default(),
        "category_ids": payload.category_ids.unwrap_or_default(),
        "technology_ids": payload.technology_ids.unwrap_or_default(),
        "github": payload.github.unwrap_or_default(),
        "live": payload.live.unwrap_or_default(),
        "featured": payload.featured.unwrap_or(false),
    });

    match store::create(collections::PROJECTS, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Project::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating project").into_response(),
    }
}

/// PATCH /api/projects/{id} (auth required)
pub async fn update_project(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(name) = payload.name {
        patch.insert("name".to_string(), json!(name));
    }
    if let Some(description) = payload.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(long_description) = payload.long_description {
        patch.insert("long_description".to_string(), json!(long_description));
    }
    if let Some(category_ids) = payload.category_ids {
        patch.insert("category_ids".to_string(), json!(category_ids));
    }
    if let Some(technology_ids) = payload.technology_ids {
        patch.insert("technology_ids".to_string(), json!(technology_ids));
    }
    if let Some(github) = payload.github {
        patch.insert("github".to_string(), json!(github));
    }
    if let Some(live) = payload.live {
        patch.insert("live".to_string(), json!(live));
    }
    if let Some(featured) = payload.featured {
        patch.insert("featured".to_string(), json!(featured));
    }

    match store::update(collections::PROJECTS, &id, patch.into()).await {
        Ok(doc) => Json(Project::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating project").into_response(),
    }
}

/// PUT /api/projects/{id}/image (auth required, multipart)
/// Uploads the new binary, deletes the superseded object best-effort, and
/// stores the new object id; the viewable URL is derived from it.
pub async fn replace_project_image(
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match replace_attachment(collections::PROJECTS, &id, "image_id", multipart).await {
        Ok(image) => Json(image).into_response(),
        Err(err_response) => err_response.into_response(),
    }
}

/// DELETE /api/projects/{id} (auth required)
/// The project's stored image goes with it, best-effort.
pub async fn delete_project(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let project = match fetch::by_id(collections::PROJECTS, &id, Project::from_doc).await {
        Ok(Some(project)) => project,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching project").into_response(),
    };

    match store::delete(collections::PROJECTS, &id).await {
        Ok(()) => {
            if !project.image.is_placeholder() {
                if let Err(e) = crate::storage::media().delete(&project.image.id).await {
                    tracing::warn!(
                        "Failed to delete image {} of project {}: {}",
                        project.image.id,
                        id,
                        e
                    );
                }
            }
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => store_error(e, "deleting project").into_response(),
    }
}
