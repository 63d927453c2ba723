/**
 * Experience Routes
 * Work experience with nested accomplishments, plus education records.
 */
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::content::collections;
use crate::content::experience::{Education, Experience, ExperienceAccomplishment};
use crate::content::fetch;
use crate::content::taxonomy::{Category, Technology};
use crate::content::views;
use crate::db::store::{self, ListQuery};
use crate::routes::auth::verify_auth;
use crate::routes::{bad_request, not_found, store_error, SuccessResponse};

// ============================================================================
// Experience
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperienceRequest {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub technology_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub technology_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDetail {
    #[serde(flatten)]
    pub experience: Experience,
    pub accomplishments: Vec<ExperienceAccomplishment>,
}

/// GET /api/experience
/// Entities with their reference arrays resolved to display names.
pub async fn list_experience() -> impl IntoResponse {
    let (experiences, categories, technologies) = tokio::join!(
        fetch::collection(collections::EXPERIENCES, Experience::from_doc),
        fetch::collection(collections::CATEGORIES, Category::from_doc),
        fetch::collection(collections::TECHNOLOGIES, Technology::from_doc),
    );
    Json(views::experiences_with_names(
        &experiences,
        &categories,
        &technologies,
    ))
}

/// GET /api/experience/{id}
/// The experience is fetched first, then its accomplishments; the second
/// read depends on the first, so the two are awaited in order.
pub async fn get_experience(Path(id): Path<String>) -> impl IntoResponse {
    let experience = match fetch::by_id(collections::EXPERIENCES, &id, Experience::from_doc).await
    {
        Ok(Some(experience)) => experience,
        Ok(None) => return not_found().into_response(),
        Err(e) => return store_error(e, "fetching experience").into_response(),
    };

    let accomplishments = fetch::filtered(
        collections::ACCOMPLISHMENTS,
        &ListQuery::new().equals("experience_id", id.as_str()),
        ExperienceAccomplishment::from_doc,
    )
    .await;

    Json(ExperienceDetail {
        experience,
        accomplishments,
    })
    .into_response()
}

/// POST /api/experience (auth required)
pub async fn create_experience(
    headers: HeaderMap,
    Json(payload): Json<CreateExperienceRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.title.trim().is_empty() || payload.company.trim().is_empty() {
        return bad_request("Title and company are required").into_response();
    }

    let data = json!({
        "title": payload.title,
        "company": payload.company,
        "location": payload.location.unwrap_or_default(),
        "start_date": payload.start_date.unwrap_or_default(),
        "end_date": payload.end_date.unwrap_or_default(),
        "description": payload.description.unwrap_or_default(),
        "category_ids": payload.category_ids.unwrap_or_default(),
        "technology_ids": payload.technology_ids.unwrap_or_default(),
    });

    match store::create(collections::EXPERIENCES, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Experience::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating experience").into_response(),
    }
}

/// PATCH /api/experience/{id} (auth required)
pub async fn update_experience(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateExperienceRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(title) = payload.title {
        patch.insert("title".to_string(), json!(title));
    }
    if let Some(company) = payload.company {
        patch.insert("company".to_string(), json!(company));
    }
    if let Some(location) = payload.location {
        patch.insert("location".to_string(), json!(location));
    }
    if let Some(start_date) = payload.start_date {
        patch.insert("start_date".to_string(), json!(start_date));
    }
    if let Some(end_date) = payload.end_date {
        patch.insert("end_date".to_string(), json!(end_date));
    }
    if let Some(description) = payload.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(category_ids) = payload.category_ids {
        patch.insert("category_ids".to_string(), json!(category_ids));
    }
    if let Some(technology_ids) = payload.technology_ids {
        patch.insert("technology_ids".to_string(), json!(technology_ids));
    }

    match store::update(collections::EXPERIENCES, &id, patch.into()).await {
        Ok(doc) => Json(Experience::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating experience").into_response(),
    }
}

/// DELETE /api/experience/{id} (auth required)
/// Nested accomplishments are removed with their parent.
pub async fn delete_experience(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let accomplishments = fetch::filtered(
        collections::ACCOMPLISHMENTS,
        &ListQuery::new().equals("experience_id", id.as_str()),
        ExperienceAccomplishment::from_doc,
    )
    .await;
    for accomplishment in accomplishments {
        if let Err(e) = store::delete(collections::ACCOMPLISHMENTS, &accomplishment.id).await {
            tracing::warn!(
                "Failed to delete accomplishment {} of experience {}: {}",
                accomplishment.id,
                id,
                e
            );
        }
    }

    match store::delete(collections::EXPERIENCES, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting experience").into_response(),
    }
}

// ============================================================================
// Accomplishments
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccomplishmentRequest {
    pub experience_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccomplishmentRequest {
    pub text: Option<String>,
}

/// POST /api/accomplishments (auth required)
pub async fn create_accomplishment(
    headers: HeaderMap,
    Json(payload): Json<CreateAccomplishmentRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.experience_id.trim().is_empty() || payload.text.trim().is_empty() {
        return bad_request("Experience id and text are required").into_response();
    }

    let data = json!({
        "experience_id": payload.experience_id,
        "text": payload.text,
    });

    match store::create(collections::ACCOMPLISHMENTS, None, data).await {
        Ok(doc) => (
            StatusCode::CREATED,
            Json(ExperienceAccomplishment::from_doc(&doc)),
        )
            .into_response(),
        Err(e) => store_error(e, "creating accomplishment").into_response(),
    }
}

/// PATCH /api/accomplishments/{id} (auth required)
pub async fn update_accomplishment(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccomplishmentRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(text) = payload.text {
        patch.insert("text".to_string(), json!(text));
    }

    match store::update(collections::ACCOMPLISHMENTS, &id, patch.into()).await {
        Ok(doc) => Json(ExperienceAccomplishment::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating accomplishment").into_response(),
    }
}

/// DELETE /api/accomplishments/{id} (auth required)
pub async fn delete_accomplishment(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::ACCOMPLISHMENTS, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting accomplishment").into_response(),
    }
}

// ============================================================================
// Education
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEducationRequest {
    pub degree: String,
    pub institution: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_current: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEducationRequest {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_current: Option<bool>,
}

/// GET /api/education
pub async fn list_education() -> impl IntoResponse {
    let education = fetch::collection(collections::EDUCATION, Education::from_doc).await;
    Json(education)
}

/// POST /api/education (auth required)
pub async fn create_education(
    headers: HeaderMap,
    Json(payload): Json<CreateEducationRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.degree.trim().is_empty() || payload.institution.trim().is_empty() {
        return bad_request("Degree and institution are required").into_response();
    }

    let data = json!({
        "degree": payload.degree,
        "institution": payload.institution,
        "start_date": payload.start_date.unwrap_or_default(),
        "end_date": payload.end_date.unwrap_or_default(),
        "location": payload.location.unwrap_or_default(),
        "description": payload.description.unwrap_or_default(),
        "is_current": payload.is_current.unwrap_or(false),
    });

    match store::create(collections::EDUCATION, None, data).await {
        Ok(doc) => (StatusCode::CREATED, Json(Education::from_doc(&doc))).into_response(),
        Err(e) => store_error(e, "creating education record").into_response(),
    }
}

/// PATCH /api/education/{id} (auth required)
pub async fn update_education(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEducationRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let mut patch = serde_json::Map::new();
    if let Some(degree) = payload.degree {
        patch.insert("degree".to_string(), json!(degree));
    }
    if let Some(institution) = payload.institution {
        patch.insert("institution".to_string(), json!(institution));
    }
    if let Some(start_date) = payload.start_date {
        patch.insert("start_date".to_string(), json!(start_date));
    }
    if let Some(end_date) = payload.end_date {
        patch.insert("end_date".to_string(), json!(end_date));
    }
    if let Some(location) = payload.location {
        patch.insert("location".to_string(), json!(location));
    }
    if let Some(description) = payload.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(is_current) = payload.is_current {
        patch.insert("is_current".to_string(), json!(is_current));
    }

    match store::update(collections::EDUCATION, &id, patch.into()).await {
        Ok(doc) => Json(Education::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "updating education record").into_response(),
    }
}

/// DELETE /api/education/{id} (auth required)
pub async fn delete_education(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::EDUCATION, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting education record").into_response(),
    }
}
