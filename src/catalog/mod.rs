mod builder;
mod checksum;
mod ids;
mod models;

pub use builder::{
    build_release, AudioFormat, BuildError, PublishedAssets, ReleaseParams, RequiredParams,
    DEFAULT_ARTIST, DEFAULT_DURATION, DEFAULT_KEY,
};
pub use checksum::checksum_md5;
pub use ids::{generate_catalog_id, generate_slug, CATALOG_ID_PREFIX};
pub use models::{now_timestamp, Catalog, ReleaseRecord, CATALOG_VERSION};

#[cfg(test)]
pub(crate) use models::test_support;
