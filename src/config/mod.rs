mod file_config;

pub use file_config::{FileConfig, StorageConfig, TelegramConfig};

use crate::announce::{TelegramClient, DEFAULT_TELEGRAM_API_URL};
use crate::storage::{AssetPublisher, LocalAssetPublisher, R2Config, S3AssetPublisher};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "catalog.json";
pub const DEFAULT_SITE_URL: &str = "https://deeppi.app";
pub const DEFAULT_HTTP_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub catalog_path: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    /// `None` means the built-in schema.
    pub schema_path: Option<PathBuf>,
    pub site_url: String,
    pub storage: StorageSettings,
    /// `None` when no bot token or channel is configured.
    pub telegram: Option<TelegramSettings>,
}

#[derive(Debug, Clone)]
pub enum StorageSettings {
    R2(R2Config),
    Local {
        root: PathBuf,
        public_base_url: String,
    },
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub channel_id: String,
    pub api_url: String,
    pub timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, optional TOML file config
    /// and the process environment.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        Self::resolve_with_env(cli, file_config, |name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::resolve`] with an explicit environment lookup.
    /// TOML values override CLI values where present, and secrets fall back
    /// to environment variables.
    pub fn resolve_with_env<F>(cli: &CliConfig, file_config: Option<FileConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file_config.unwrap_or_default();
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let catalog_path = file
            .catalog_path
            .map(PathBuf::from)
            .or_else(|| cli.catalog_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
        if catalog_path.is_dir() {
            bail!("catalog_path is a directory: {:?}", catalog_path);
        }

        let schema_path = file
            .schema_path
            .map(PathBuf::from)
            .or_else(|| cli.schema_path.clone());

        let site_url = file
            .site_url
            .or_else(|| env("NEXT_PUBLIC_SITE_URL"))
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let storage_file = file.storage.unwrap_or_default();
        let public_url = storage_file
            .public_url
            .clone()
            .or_else(|| env("R2_PUBLIC_URL"))
            .unwrap_or_default();
        let storage = match storage_file.backend.as_deref().unwrap_or("r2") {
            "r2" => StorageSettings::R2(R2Config {
                account_id: storage_file
                    .account_id
                    .or_else(|| env("R2_ACCOUNT_ID"))
                    .unwrap_or_default(),
                access_key_id: storage_file
                    .access_key_id
                    .or_else(|| env("R2_ACCESS_KEY_ID"))
                    .unwrap_or_default(),
                secret_access_key: storage_file
                    .secret_access_key
                    .or_else(|| env("R2_SECRET_ACCESS_KEY"))
                    .unwrap_or_default(),
                bucket_name: storage_file
                    .bucket_name
                    .or_else(|| env("R2_BUCKET_NAME"))
                    .unwrap_or_default(),
                public_url,
                endpoint_url: storage_file.endpoint_url,
            }),
            "local" => {
                let root = storage_file.local_root.map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("storage.local_root must be set for the local backend")
                })?;
                if public_url.is_empty() {
                    bail!("storage.public_url must be set for the local backend");
                }
                StorageSettings::Local {
                    root,
                    public_base_url: public_url,
                }
            }
            other => bail!("Unknown storage backend '{}', expected 'r2' or 'local'", other),
        };

        let telegram_file = file.telegram.unwrap_or_default();
        let bot_token = telegram_file
            .bot_token
            .or_else(|| env("TELEGRAM_BOT_TOKEN"));
        let channel_id = telegram_file
            .channel_id
            .or_else(|| env("TELEGRAM_CHANNEL_ID"));
        let telegram = match (bot_token, channel_id) {
            (Some(bot_token), Some(channel_id)) => Some(TelegramSettings {
                bot_token,
                channel_id,
                api_url: telegram_file
                    .api_url
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
                timeout_sec: telegram_file
                    .timeout_sec
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SEC),
            }),
            _ => None,
        };

        Ok(Self {
            catalog_path,
            schema_path,
            site_url,
            storage,
            telegram,
        })
    }

    pub fn release_url(&self, slug: &str) -> String {
        crate::announce::release_page_url(&self.site_url, slug)
    }

    /// Builds the publisher for the configured storage backend.
    pub async fn asset_publisher(&self) -> Result<Box<dyn AssetPublisher>> {
        match &self.storage {
            StorageSettings::R2(r2) => {
                let publisher = S3AssetPublisher::new(r2.clone())
                    .await
                    .context("Object storage is not configured")?;
                Ok(Box::new(publisher))
            }
            StorageSettings::Local {
                root,
                public_base_url,
            } => Ok(Box::new(LocalAssetPublisher::new(
                root.clone(),
                public_base_url.clone(),
            ))),
        }
    }

    pub fn telegram_client(&self) -> Result<TelegramClient> {
        let settings = self.telegram.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Telegram is not configured, set TELEGRAM_BOT_TOKEN and TELEGRAM_CHANNEL_ID"
            )
        })?;
        TelegramClient::new(
            settings.api_url.clone(),
            settings.bot_token.clone(),
            settings.channel_id.clone(),
            settings.timeout_sec,
        )
    }
}
