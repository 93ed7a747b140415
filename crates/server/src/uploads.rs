//! Multipart forms for provider and service writes.
//!
//! Text parts become a JSON object (repeated names turn into arrays) that the
//! lenient model inputs deserialize. Image parts are checked in full before
//! anything touches the disk. Files stored for a form are removed again when
//! the write they were uploaded for is rejected (see `StoredFiles::settle`).

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use configs::UploadConfig;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use common::ApiResponse;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ApiError;

pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const GALLERY_FIELD: &str = "gallery";

const THUMBNAIL_DIR: &str = common::env::UPLOAD_SUBDIRS[0];
const GALLERY_DIR: &str = common::env::UPLOAD_SUBDIRS[1];

struct PendingFile {
    ext: String,
    bytes: Bytes,
}

/// Paths written while reading one form.
#[derive(Debug, Default)]
pub struct StoredFiles(Vec<PathBuf>);

impl StoredFiles {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub async fn discard(self) {
        for path in self.0 {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "upload cleanup failed");
            }
        }
    }

    /// Keep the files only when the write succeeded.
    pub async fn settle<T>(self, outcome: Result<ApiResponse<T>, ApiError>) -> Result<ApiResponse<T>, ApiError> {
        let kept = matches!(&outcome, Ok(res) if res.success);
        if !kept && !self.is_empty() {
            debug!(files = self.len(), "discarding uploads of rejected form");
            self.discard().await;
        }
        outcome
    }
}

/// A parsed form whose images are already stored.
#[derive(Debug, Default)]
pub struct UploadedForm {
    pub fields: Map<String, Value>,
    pub thumbnail: Option<String>,
    pub gallery: Vec<String>,
    files: StoredFiles,
}

impl UploadedForm {
    /// Hand over ownership of the stored files, leaving the form's URLs intact.
    pub fn take_files(&mut self) -> StoredFiles {
        std::mem::take(&mut self.files)
    }

    /// Deserialize the text fields, with stored image URLs replacing any
    /// `thumbnail`/`gallery` text when files were uploaded.
    pub fn into_input<T: DeserializeOwned>(mut self) -> Result<T, ApiError> {
        if let Some(thumbnail) = self.thumbnail {
            self.fields.insert(THUMBNAIL_FIELD.into(), Value::String(thumbnail));
        }
        if !self.gallery.is_empty() {
            let urls = self.gallery.into_iter().map(Value::String).collect();
            self.fields.insert(GALLERY_FIELD.into(), Value::Array(urls));
        }
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

fn push_field(fields: &mut Map<String, Value>, name: String, value: String) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(Value::String(value)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
        None => {
            fields.insert(name, Value::String(value));
        }
    }
}

/// Lowercased extension with its dot, or empty when the name has none.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn stored_name(ext: &str) -> String {
    format!("{}-{}{}", chrono::Utc::now().timestamp_millis(), Uuid::new_v4(), ext)
}

/// `<base>/uploads/<dir>/<file>`; the base may be empty for host-relative URLs.
pub fn public_url(cfg: &UploadConfig, dir: &str, file: &str) -> String {
    format!("{}/uploads/{}/{}", cfg.public_base_url.trim_end_matches('/'), dir, file)
}

async fn store(cfg: &UploadConfig, dir: &str, file: PendingFile, files: &mut StoredFiles) -> Result<String, ApiError> {
    let target_dir: PathBuf = Path::new(&cfg.root).join(dir);
    tokio::fs::create_dir_all(&target_dir).await?;
    let name = stored_name(&file.ext);
    let path = target_dir.join(&name);
    tokio::fs::write(&path, &file.bytes).await?;
    files.0.push(path);
    debug!(dir, file = %name, size = file.bytes.len(), "upload stored");
    Ok(public_url(cfg, dir, &name))
}

async fn store_all(
    cfg: &UploadConfig,
    form: &mut UploadedForm,
    thumbnail: Option<PendingFile>,
    gallery: Vec<PendingFile>,
) -> Result<(), ApiError> {
    if let Some(file) = thumbnail {
        form.thumbnail = Some(store(cfg, THUMBNAIL_DIR, file, &mut form.files).await?);
    }
    for file in gallery {
        let url = store(cfg, GALLERY_DIR, file, &mut form.files).await?;
        form.gallery.push(url);
    }
    Ok(())
}

/// Read the whole form, enforce image limits, then persist accepted files.
pub async fn read_form(mut multipart: Multipart, cfg: &UploadConfig) -> Result<UploadedForm, ApiError> {
    let mut fields = Map::new();
    let mut thumbnails: Vec<PendingFile> = Vec::new();
    let mut gallery: Vec<PendingFile> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let is_file_field = name == THUMBNAIL_FIELD || name == GALLERY_FIELD;

        let Some(file_name) = file_name.filter(|_| is_file_field) else {
            let text = field.text().await?;
            if !name.is_empty() {
                push_field(&mut fields, name, text);
            }
            continue;
        };

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::BadRequest("Only image files are allowed".into()));
        }
        let bytes = field.bytes().await?;
        if bytes.len() > cfg.max_file_bytes {
            return Err(ApiError::BadRequest(format!("{file_name} exceeds {} bytes", cfg.max_file_bytes)));
        }
        let pending = PendingFile { ext: extension_of(&file_name), bytes };
        if name == THUMBNAIL_FIELD {
            thumbnails.push(pending);
        } else {
            gallery.push(pending);
        }
    }

    if thumbnails.len() > 1 {
        return Err(ApiError::BadRequest("Only one thumbnail is allowed".into()));
    }
    if gallery.len() > cfg.max_gallery_files {
        return Err(ApiError::BadRequest(format!("At most {} gallery images are allowed", cfg.max_gallery_files)));
    }

    let mut form = UploadedForm { fields, ..Default::default() };
    if let Err(e) = store_all(cfg, &mut form, thumbnails.pop(), gallery).await {
        form.take_files().discard().await;
        return Err(e);
    }
    if form.thumbnail.is_some() || !form.gallery.is_empty() {
        info!(thumbnail = form.thumbnail.is_some(), gallery = form.gallery.len(), "images_uploaded");
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::provider::ProviderCreate;

    #[test]
    fn repeated_text_fields_become_lists() {
        let mut fields = Map::new();
        push_field(&mut fields, "categories".into(), "a".into());
        push_field(&mut fields, "categories".into(), "b".into());
        push_field(&mut fields, "categories".into(), "c".into());
        push_field(&mut fields, "name".into(), "Cedar".into());
        assert_eq!(fields["categories"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(fields["name"], "Cedar");
    }

    #[test]
    fn extension_is_normalised() {
        assert_eq!(extension_of("Photo.PNG"), ".png");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("weird.p/ng"), "");
    }

    #[test]
    fn public_url_joins_base_and_dir() {
        let cfg = UploadConfig { public_base_url: "https://cdn.example.com/".into(), ..Default::default() };
        assert_eq!(public_url(&cfg, "thumbnails", "1-x.png"), "https://cdn.example.com/uploads/thumbnails/1-x.png");
        let cfg = UploadConfig::default();
        assert_eq!(public_url(&cfg, "galleries", "y.jpg"), "/uploads/galleries/y.jpg");
    }

    #[test]
    fn uploaded_images_override_text_fields() {
        let mut fields = Map::new();
        push_field(&mut fields, "name".into(), "Cedar".into());
        push_field(&mut fields, "type".into(), "clinic".into());
        push_field(&mut fields, "thumbnail".into(), "old.png".into());
        let form = UploadedForm {
            fields,
            thumbnail: Some("/uploads/thumbnails/new.png".into()),
            gallery: vec!["/uploads/galleries/g1.png".into()],
            ..Default::default()
        };
        let input: ProviderCreate = form.into_input().unwrap();
        assert_eq!(input.thumbnail.as_deref(), Some("/uploads/thumbnails/new.png"));
        assert_eq!(input.gallery, vec!["/uploads/galleries/g1.png"]);
    }

    async fn written(dir: &Path, name: &str) -> PathBuf {
        tokio::fs::create_dir_all(dir).await.unwrap();
        let path = dir.join(name);
        tokio::fs::write(&path, b"img").await.unwrap();
        path
    }

    #[tokio::test]
    async fn rejected_write_discards_stored_files() {
        let dir = std::env::temp_dir().join(format!("uploads-{}", Uuid::new_v4()));
        let kept = written(&dir, "kept.png").await;
        let dropped = written(&dir, "dropped.png").await;
        let failed = written(&dir, "failed.png").await;

        let ok = StoredFiles(vec![kept.clone()]).settle(Ok(ApiResponse::ok(1, "done"))).await;
        assert!(ok.is_ok());
        assert!(kept.exists());

        let envelope = StoredFiles(vec![dropped.clone()]).settle(Ok(ApiResponse::<u8>::fail("Provider not found"))).await;
        assert!(envelope.is_ok());
        assert!(!dropped.exists());

        let err = StoredFiles(vec![failed.clone()]).settle::<u8>(Err(ApiError::BadRequest("bad".into()))).await;
        assert!(err.is_err());
        assert!(!failed.exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
