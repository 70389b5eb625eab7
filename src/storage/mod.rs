//! Asset publishing: put release files in object storage, get public URLs.

mod layout;
mod local;
mod s3;

pub use layout::ReleaseStorageLayout;
pub use local::LocalAssetPublisher;
pub use s3::{R2Config, S3AssetPublisher};

use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 SDK error: {0}")]
    SdkError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Object storage as seen by the upload flow.
#[async_trait::async_trait]
pub trait AssetPublisher: Send + Sync {
    /// Public URL an object stored under `key` is served from.
    fn object_url(&self, key: &str) -> String;

    /// Stores `bytes` under `key` and returns the object's public URL.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Content type sent with an upload, chosen from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("jpg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Reads a local file and publishes it under `key`.
pub async fn publish_file(
    publisher: &dyn AssetPublisher,
    path: &Path,
    key: &str,
) -> Result<String, StorageError> {
    let bytes = tokio::fs::read(path).await?;
    let content_type = content_type_for(path);
    let url = publisher.put_object(key, bytes, content_type).await?;
    info!("Uploaded {} -> {}", path.display(), url);
    Ok(url)
}

/// Joins a public base URL and an object key with exactly one slash.
pub(crate) fn public_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}
