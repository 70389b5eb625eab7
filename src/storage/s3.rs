//! S3-compatible publisher, configured for Cloudflare R2 by default.

use super::{public_url, AssetPublisher, StorageError};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

/// R2 connection settings.
#[derive(Clone, Debug, Default)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    /// Base of the public URLs handed back for uploaded objects.
    pub public_url: String,
    /// Overrides the endpoint derived from `account_id`.
    pub endpoint_url: Option<String>,
}

impl R2Config {
    pub fn validate(&self) -> Result<(), StorageError> {
        let required = [
            ("bucket name", &self.bucket_name),
            ("access key ID", &self.access_key_id),
            ("secret access key", &self.secret_access_key),
            ("public URL", &self.public_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(StorageError::Config(format!("R2 {} cannot be empty", name)));
            }
        }
        if self.endpoint_url.is_none() && self.account_id.trim().is_empty() {
            return Err(StorageError::Config(
                "R2 account ID cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> String {
        match &self.endpoint_url {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.r2.cloudflarestorage.com", self.account_id),
        }
    }
}

pub struct S3AssetPublisher {
    client: Client,
    bucket_name: String,
    public_url: String,
}

impl S3AssetPublisher {
    pub async fn new(config: R2Config) -> Result<Self, StorageError> {
        config.validate()?;
        let endpoint = config.endpoint();
        info!("Using object storage endpoint {}", endpoint);

        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "deeppi-r2-config",
        );
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();

        Ok(S3AssetPublisher {
            client: Client::from_conf(s3_config),
            bucket_name: config.bucket_name,
            public_url: config.public_url,
        })
    }
}

#[async_trait::async_trait]
impl AssetPublisher for S3AssetPublisher {
    fn object_url(&self, key: &str) -> String {
        public_url(&self.public_url, key)
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        debug!(
            "Uploading {} bytes to s3://{}/{}",
            bytes.len(),
            self.bucket_name,
            key
        );
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::SdkError(format!("Put object {} failed: {}", key, e)))?;
        Ok(self.object_url(key))
    }
}
