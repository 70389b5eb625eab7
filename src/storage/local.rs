//! Publisher writing objects into a local directory.

use super::{public_url, AssetPublisher, StorageError};
use std::path::PathBuf;
use tracing::debug;

pub struct LocalAssetPublisher {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetPublisher {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        LocalAssetPublisher {
            root,
            public_base_url,
        }
    }
}

#[async_trait::async_trait]
impl AssetPublisher for LocalAssetPublisher {
    fn object_url(&self, key: &str) -> String {
        public_url(&self.public_base_url, key)
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if key.split('/').any(|segment| segment == "..") {
            return Err(StorageError::Config(format!(
                "Object key '{}' escapes the storage root",
                key
            )));
        }
        let dest = self.root.join(key.trim_start_matches('/'));
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, &bytes).await?;
        debug!(
            "Stored {} bytes ({}) at {}",
            bytes.len(),
            content_type,
            dest.display()
        );
        Ok(self.object_url(key))
    }
}
