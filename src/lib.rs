//! DeepPI release catalog tooling.
//!
//! Library side of the `catalog-upload`, `catalog-validate` and
//! `catalog-announce` binaries. Exposed as a library for the integration tests.

pub mod announce;
pub mod catalog;
pub mod catalog_store;
pub mod cli;
pub mod config;
pub mod publish;
pub mod schema;
pub mod storage;

pub use announce::{format_release, Announcer, TelegramClient};
pub use catalog::{Catalog, ReleaseParams, ReleaseRecord};
pub use catalog_store::{CatalogStore, JsonFileCatalogStore, MemoryCatalogStore};
pub use config::{AppConfig, CliConfig, FileConfig};
pub use publish::publish_release;
pub use schema::{CatalogSchema, ValidationReport};
pub use storage::{AssetPublisher, LocalAssetPublisher, S3AssetPublisher};
