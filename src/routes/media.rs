/**
 * Media Routes
 * Admin endpoints over the binary object store, and the shared
 * attachment-replacement flow used by entity image endpoints.
 */
use axum::{
    extract::{Multipart, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::content::attachment::{sync_attachment, ImageRef};
use crate::content::field;
use crate::db::store;
use crate::routes::auth::verify_auth;
use crate::routes::{not_found, store_error, ErrorResponse};
use crate::storage::{self, StorageError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub object_id: String,
    pub url: String,
    pub preview_url: String,
    pub size: usize,
}

/// Pull the first file out of a multipart body.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, String), (StatusCode, Json<ErrorResponse>)> {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("No file provided")),
            ));
        }
        Err(e) => {
            tracing::error!("Multipart error: {}", e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid multipart data")),
            ));
        }
    };

    let original_name = field.file_name().unwrap_or("unknown").to_string();

    let bytes = match field.bytes().await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("Failed to read upload bytes: {}", e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Failed to read file data")),
            ));
        }
    };

    Ok((bytes.to_vec(), original_name))
}

fn storage_error(e: StorageError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        StorageError::UnsupportedType => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Unsupported file type. Allowed: JPEG, PNG, WebP, GIF.",
            )),
        ),
        StorageError::TooLarge(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("File too large. Maximum size is 5MB.")),
        ),
        StorageError::Empty => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Empty file")),
        ),
        StorageError::InvalidId(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid object id")),
        ),
        StorageError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("File not found")),
        ),
        StorageError::Io(e) => {
            tracing::error!("Storage io error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to store file")),
            )
        }
    }
}

/// Replace the binary attachment behind `field_key` on a document: upload
/// the new payload, delete the superseded object best-effort, persist the
/// new object id. Returns the new identifier/URL pair.
pub async fn replace_attachment(
    collection: &str,
    id: &str,
    field_key: &str,
    multipart: Multipart,
) -> Result<ImageRef, (StatusCode, Json<ErrorResponse>)> {
    let (bytes, original_name) = read_upload(multipart).await?;

    let doc = match store::get(collection, id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return Err(not_found()),
        Err(e) => return Err(store_error(e, "fetching entity for attachment")),
    };

    let current_id = field::text(&doc.data, field_key);
    let image = sync_attachment(
        storage::media(),
        &current_id,
        Some((&bytes, &original_name)),
    )
    .await
    .map_err(storage_error)?;

    let patch = serde_json::json!({ field_key: image.id });
    if let Err(e) = store::update(collection, id, patch).await {
        return Err(store_error(e, "persisting attachment id"));
    }

    Ok(image)
}

/// POST /api/media (auth required)
/// Standalone upload for the admin media picker.
pub async fn upload_media(headers: HeaderMap, multipart: Multipart) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    let (bytes, original_name) = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(err_response) => return err_response.into_response(),
    };

    let media = storage::media();
    match media.upload(&bytes, &original_name).await {
        Ok(object_id) => {
            let response = UploadResponse {
                url: media.view_url(&object_id),
                preview_url: media.preview_url(&object_id, 400, 300, 80),
                object_id,
                size: bytes.len(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => storage_error(e).into_response(),
    }
}

/// DELETE /api/media/{object_id} (auth required)
pub async fn delete_media(headers: HeaderMap, Path(object_id): Path<String>) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match storage::media().delete(&object_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => storage_error(e).into_response(),
    }
}

/// GET /api/media (auth required)
pub async fn list_media(headers: HeaderMap) -> impl IntoResponse {
    if let Err(err_response) = verify_auth(&headers) {
        return err_response.into_response();
    }

    match storage::media().list().await {
        Ok(objects) => Json(objects).into_response(),
        Err(e) => storage_error(e).into_response(),
    }
}
