/**
 * Binary Attachments
 * Keeps an entity's stored-object identifier and its derived viewable URL
 * in sync. The pair is only ever constructed through `ImageRef`, so the
 * URL can never drift from the identifier it was derived from.
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::field;
use crate::storage::{self, MediaStore, StorageError};

/// A stored binary and its directly renderable URL. The URL is always
/// derived from the identifier; the sentinel/default identifier resolves
/// to the static placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    pub url: String,
}

impl ImageRef {
    pub fn resolve(media: &MediaStore, object_id: &str) -> Self {
        if MediaStore::is_default(object_id) {
            Self::placeholder()
        } else {
            Self {
                id: object_id.to_string(),
                url: media.view_url(object_id),
            }
        }
    }

    pub fn placeholder() -> Self {
        Self {
            id: storage::DEFAULT_OBJECT_ID.to_string(),
            url: storage::PLACEHOLDER_URL.to_string(),
        }
    }

    /// Resolve from the object-id field of a raw document payload.
    pub fn from_field(data: &Value, key: &str) -> Self {
        Self::resolve(storage::media(), &field::text(data, key))
    }

    pub fn is_placeholder(&self) -> bool {
        MediaStore::is_default(&self.id)
    }
}

/// Replace (or keep) an entity's attachment. A new payload is uploaded
/// first and the superseded object is then deleted best-effort: a cleanup
/// failure is logged and never aborts the save. Upload failures propagate.
/// Without a payload the existing identifier/URL pair stands as-is.
pub async fn sync_attachment(
    media: &MediaStore,
    current_id: &str,
    payload: Option<(&[u8], &str)>,
) -> Result<ImageRef, StorageError> {
    let Some((bytes, original_name)) = payload else {
        return Ok(ImageRef::resolve(media, current_id));
    };

    let new_id = media.upload(bytes, original_name).await?;

    if !MediaStore::is_default(current_id) {
        if let Err(e) = media.delete(current_id).await {
            tracing::warn!(
                "Failed to delete superseded object {}: {}; continuing",
                current_id,
                e
            );
        }
    }

    Ok(ImageRef::resolve(media, &new_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 32]);
        bytes
    }

    #[test]
    fn test_resolve_derives_url_from_id() {
        let media = MediaStore::new("/tmp/media", "/uploads/media");
        let image = ImageRef::resolve(&media, "abc.png");
        assert_eq!(image.id, "abc.png");
        assert_eq!(image.url, "/uploads/media/abc.png");
    }

    #[test]
    fn test_resolve_sentinel_and_empty_give_placeholder() {
        let media = MediaStore::new("/tmp/media", "/uploads/media");
        assert_eq!(ImageRef::resolve(&media, "default"), ImageRef::placeholder());
        assert_eq!(ImageRef::resolve(&media, ""), ImageRef::placeholder());
        assert!(ImageRef::resolve(&media, "").is_placeholder());
    }

    #[test]
    fn test_from_field_missing_key_gives_placeholder() {
        let data = json!({ "name": "no image here" });
        assert!(ImageRef::from_field(&data, "image_id").is_placeholder());
    }

    #[tokio::test]
    async fn test_sync_without_payload_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path(), "/uploads/media");

        let image = sync_attachment(&media, "kept.png", None).await.unwrap();
        assert_eq!(image.id, "kept.png");
        assert_eq!(image.url, "/uploads/media/kept.png");

        let image = sync_attachment(&media, "", None).await.unwrap();
        assert!(image.is_placeholder());
    }

    #[tokio::test]
    async fn test_sync_replaces_and_deletes_old_object() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path(), "/uploads/media");

        let old_id = media.upload(&png_bytes(), "old.png").await.unwrap();
        assert!(dir.path().join(&old_id).exists());

        let image = sync_attachment(&media, &old_id, Some((&png_bytes(), "new.png")))
            .await
            .unwrap();

        assert_ne!(image.id, old_id);
        assert!(image.url.ends_with(&image.id));
        assert!(dir.path().join(&image.id).exists());
        // superseded object is gone
        assert!(!dir.path().join(&old_id).exists());
    }

    #[tokio::test]
    async fn test_sync_from_default_deletes_nothing_and_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path(), "/uploads/media");

        let image = sync_attachment(&media, "default", Some((&png_bytes(), "first.png")))
            .await
            .unwrap();
        assert!(!image.is_placeholder());
        assert!(dir.path().join(&image.id).exists());
    }

    #[tokio::test]
    async fn test_sync_upload_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path(), "/uploads/media");

        let result = sync_attachment(&media, "old.png", Some((b"not an image", "x.png"))).await;
        assert!(matches!(result, Err(StorageError::UnsupportedType)));
    }
}
