/**
 * Media Storage
 * Filesystem-backed binary object store: upload, delete, view URLs and
 * resized preview URLs. Object identifiers are UUID filenames.
 */
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Sentinel object id meaning "no custom binary attached". Distinct from an
/// empty string, which means the field was never set at all.
pub const DEFAULT_OBJECT_ID: &str = "default";

/// Static placeholder served when an entity has no custom image.
pub const PLACEHOLDER_URL: &str = "/static/placeholder.png";

const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

static MEDIA: Lazy<MediaStore> = Lazy::new(MediaStore::from_env);

/// Process-wide store configured from the environment.
pub fn media() -> &'static MediaStore {
    &MEDIA
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported file type")]
    UnsupportedType,
    #[error("file too large ({0} bytes)")]
    TooLarge(usize),
    #[error("empty file")]
    Empty,
    #[error("invalid object id: {0}")]
    InvalidId(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    pub object_id: String,
    pub url: String,
    pub size: u64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_base: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    pub fn from_env() -> Self {
        let root = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "uploads/media".to_string());
        let base = std::env::var("MEDIA_BASE_URL").unwrap_or_else(|_| "/uploads/media".to_string());
        Self::new(root, base)
    }

    /// True for the sentinel and for a never-set id; such ids have no stored
    /// object behind them and must never be passed to `delete`.
    pub fn is_default(object_id: &str) -> bool {
        object_id.is_empty() || object_id == DEFAULT_OBJECT_ID
    }

    /// Directly renderable URL for an object id.
    pub fn view_url(&self, object_id: &str) -> String {
        format!("{}/{}", self.public_base, object_id)
    }

    /// URL of a server-resized preview of the object.
    pub fn preview_url(&self, object_id: &str, width: u32, height: u32, quality: u8) -> String {
        format!(
            "{}/{}?w={}&h={}&q={}",
            self.public_base, object_id, width, height, quality
        )
    }

    /// Validate and persist a binary payload; returns the new object id.
    pub async fn upload(&self, bytes: &[u8], original_name: &str) -> Result<String, StorageError> {
        let original_ext = original_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&original_ext.as_str()) {
            return Err(StorageError::UnsupportedType);
        }

        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if bytes.len() > MAX_FILE_SIZE {
            return Err(StorageError::TooLarge(bytes.len()));
        }

        let mime_type = validate_image_magic_bytes(bytes).ok_or(StorageError::UnsupportedType)?;

        tokio::fs::create_dir_all(&self.root).await?;

        let ext = extension_from_mime(mime_type);
        let object_id = format!("{}.{}", Uuid::new_v4(), ext);
        let file_path = self.root.join(&object_id);
        tokio::fs::write(&file_path, bytes).await?;

        tracing::info!("Stored object {} ({} bytes)", object_id, bytes.len());
        Ok(object_id)
    }

    pub async fn delete(&self, object_id: &str) -> Result<(), StorageError> {
        if !is_safe_object_id(object_id) {
            return Err(StorageError::InvalidId(object_id.to_string()));
        }

        let file_path = self.root.join(object_id);
        if !file_path.exists() {
            return Err(StorageError::NotFound(object_id.to_string()));
        }

        tokio::fs::remove_file(&file_path).await?;
        tracing::info!("Deleted object {}", object_id);
        Ok(())
    }

    /// List stored objects, newest first (admin media picker).
    pub async fn list(&self) -> Result<Vec<ObjectInfo>, StorageError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let mut objects = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let object_id = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            let ext = object_id.rsplit('.').next().unwrap_or("").to_lowercase();
            if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(_) => continue,
            };

            let created_at = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map(|t| t.into())
                .ok();

            objects.push(ObjectInfo {
                url: self.view_url(&object_id),
                object_id,
                size: metadata.len(),
                created_at,
            });
        }

        objects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(objects)
    }
}

fn validate_image_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn extension_from_mime(mime: &str) -> &str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn is_safe_object_id(object_id: &str) -> bool {
    // Reject path traversal and special characters
    !object_id.is_empty()
        && !object_id.contains("..")
        && !object_id.contains('/')
        && !object_id.contains('\\')
        && !object_id.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid PNG header followed by filler
    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 64]);
        bytes
    }

    #[test]
    fn test_is_default_sentinel_and_empty() {
        assert!(MediaStore::is_default(""));
        assert!(MediaStore::is_default(DEFAULT_OBJECT_ID));
        assert!(!MediaStore::is_default("abc.png"));
    }

    #[test]
    fn test_view_and_preview_urls() {
        let store = MediaStore::new("/tmp/media", "/uploads/media");
        assert_eq!(store.view_url("a.png"), "/uploads/media/a.png");
        assert_eq!(
            store.preview_url("a.png", 400, 300, 80),
            "/uploads/media/a.png?w=400&h=300&q=80"
        );
    }

    #[test]
    fn test_magic_bytes_validation() {
        assert_eq!(
            validate_image_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(validate_image_magic_bytes(&png_bytes()), Some("image/png"));
        assert_eq!(validate_image_magic_bytes(b"not an image"), None);
        assert_eq!(validate_image_magic_bytes(&[0xFF]), None);
    }

    #[test]
    fn test_object_id_safety() {
        assert!(is_safe_object_id("abc.png"));
        assert!(!is_safe_object_id("../etc/passwd"));
        assert!(!is_safe_object_id("a/b.png"));
        assert!(!is_safe_object_id(""));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path(), "/uploads/media");

        let err = store.upload(&png_bytes(), "note.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedType));

        let err = store.upload(&[], "a.png").await.unwrap_err();
        assert!(matches!(err, StorageError::Empty));

        let err = store.upload(b"plain text", "a.png").await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedType));
    }

    #[tokio::test]
    async fn test_upload_then_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path(), "/uploads/media");

        let object_id = store.upload(&png_bytes(), "photo.png").await.unwrap();
        assert!(object_id.ends_with(".png"));
        assert!(dir.path().join(&object_id).exists());

        store.delete(&object_id).await.unwrap();
        assert!(!dir.path().join(&object_id).exists());

        let err = store.delete(&object_id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
