/**
 * Site Routes
 * Site settings, contact-form submissions, the guest book, and visitor
 * analytics.
 */
use axum::{
    extract::{ConnectInfo, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;

use crate::content::collections;
use crate::content::fetch;
use crate::content::site::{ContactSubmission, GuestBookMessage, SiteSetting, Visitor};
use crate::db::store::{self, ListQuery};
use crate::geo;
use crate::routes::auth::verify_auth;
use crate::routes::{bad_request, store_error, SuccessResponse};

// ============================================================================
// Site Settings
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutSettingRequest {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// GET /api/settings
pub async fn list_settings() -> impl IntoResponse {
    let settings = fetch::collection(collections::SETTINGS, SiteSetting::from_doc).await;
    Json(settings)
}

/// PUT /api/settings (auth required)
/// Upserts by key; the key doubles as the document id.
pub async fn put_setting(
    headers: HeaderMap,
    Json(payload): Json<PutSettingRequest>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    if payload.key.trim().is_empty() {
        return bad_request("Key is required").into_response();
    }

    let data = json!({
        "key": payload.key,
        "value": payload.value,
        "description": payload.description.unwrap_or_default(),
    });

    let existing = match store::get(collections::SETTINGS, &payload.key).await {
        Ok(existing) => existing,
        Err(e) => return store_error(e, "fetching setting").into_response(),
    };

    let result = match existing {
        Some(_) => store::update(collections::SETTINGS, &payload.key, data).await,
        None => store::create(collections::SETTINGS, Some(payload.key.clone()), data).await,
    };

    match result {
        Ok(doc) => Json(SiteSetting::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "saving setting").into_response(),
    }
}

/// DELETE /api/settings/{key} (auth required)
pub async fn delete_setting(headers: HeaderMap, Path(key): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::SETTINGS, &key).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting setting").into_response(),
    }
}

// ============================================================================
// Contact Submissions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// POST /api/contact - public
pub async fn submit_contact(Json(payload): Json<ContactRequest>) -> impl IntoResponse {
    if payload.name.trim().is_empty() || payload.message.trim().is_empty() {
        return bad_request("Name and message are required").into_response();
    }
    if !payload.email.contains('@') {
        return bad_request("Invalid email format").into_response();
    }

    let data = json!({
        "name": ammonia::clean(&payload.name),
        "email": payload.email,
        "subject": ammonia::clean(&payload.subject.unwrap_or_default()),
        "message": ammonia::clean(&payload.message),
        "read": false,
    });

    match store::create(collections::CONTACT_SUBMISSIONS, None, data).await {
        Ok(_) => (StatusCode::CREATED, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => store_error(e, "storing contact submission").into_response(),
    }
}

/// GET /api/contact (auth required)
pub async fn list_contact_submissions(headers: HeaderMap) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let submissions =
        fetch::collection(collections::CONTACT_SUBMISSIONS, ContactSubmission::from_doc).await;
    Json(submissions).into_response()
}

/// PATCH /api/contact/{id}/read (auth required)
pub async fn mark_contact_read(headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::update(collections::CONTACT_SUBMISSIONS, &id, json!({ "read": true })).await {
        Ok(doc) => Json(ContactSubmission::from_doc(&doc)).into_response(),
        Err(e) => store_error(e, "marking submission read").into_response(),
    }
}

/// DELETE /api/contact/{id} (auth required)
pub async fn delete_contact_submission(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::CONTACT_SUBMISSIONS, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting submission").into_response(),
    }
}

// ============================================================================
// Guest Book
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestBookRequest {
    pub name: String,
    pub message: String,
    pub website: Option<String>,
}

/// GET /api/guestbook
pub async fn list_guestbook() -> impl IntoResponse {
    let messages = fetch::collection(collections::GUESTBOOK, GuestBookMessage::from_doc).await;
    Json(messages)
}

/// POST /api/guestbook - public; visitor-supplied text is sanitized
/// before storage
pub async fn sign_guestbook(Json(payload): Json<GuestBookRequest>) -> impl IntoResponse {
    if payload.name.trim().is_empty() || payload.message.trim().is_empty() {
        return bad_request("Name and message are required").into_response();
    }

    let data = json!({
        "name": ammonia::clean(&payload.name),
        "message": ammonia::clean(&payload.message),
        "website": payload.website.unwrap_or_default(),
    });

    match store::create(collections::GUESTBOOK, None, data).await {
        Ok(doc) => (
            StatusCode::CREATED,
            Json(GuestBookMessage::from_doc(&doc)),
        )
            .into_response(),
        Err(e) => store_error(e, "signing guest book").into_response(),
    }
}

/// DELETE /api/guestbook/{id} (auth required)
pub async fn delete_guestbook_message(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match store::delete(collections::GUESTBOOK, &id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => store_error(e, "deleting guest book message").into_response(),
    }
}

// ============================================================================
// Visitors
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordVisitRequest {
    pub path: Option<String>,
    pub referrer: Option<String>,
}

/// POST /api/visitors - public; geolocation is looked up best-effort and
/// empty fields are stored when the collaborator is unavailable.
pub async fn record_visit(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<RecordVisitRequest>,
) -> impl IntoResponse {
    let ip = addr.ip().to_string();
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let geo = geo::lookup(&ip).await.unwrap_or_default();

    let data = json!({
        "ip": ip,
        "user_agent": user_agent,
        "path": payload.path.unwrap_or_default(),
        "referrer": payload.referrer.unwrap_or_default(),
        "country": geo.country,
        "city": geo.city,
    });

    match store::create(collections::VISITORS, None, data).await {
        Ok(_) => (StatusCode::CREATED, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => store_error(e, "recording visit").into_response(),
    }
}

/// GET /api/visitors (auth required)
/// Capped at the most recent thousand records.
pub async fn list_visitors(headers: HeaderMap) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let visitors = fetch::filtered(
        collections::VISITORS,
        &ListQuery::new().limit(1000),
        Visitor::from_doc,
    )
    .await;
    Json(visitors).into_response()
}
