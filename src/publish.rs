//! The upload flow: publish assets, build the record, prepend it to the
//! catalog.

use crate::catalog::{
    build_release, checksum_md5, generate_catalog_id, Catalog, PublishedAssets, ReleaseParams,
    ReleaseRecord,
};
use crate::catalog_store::{append_release, CatalogStore, CatalogStoreError};
use crate::storage::{content_type_for, publish_file, AssetPublisher, ReleaseStorageLayout};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

async fn upload_metadata(
    publisher: &dyn AssetPublisher,
    release: &ReleaseRecord,
    key: &str,
) -> Result<String> {
    let bytes = serde_json::to_vec_pretty(release)?;
    let url = publisher
        .put_object(key, bytes, content_type_for(Path::new(key)))
        .await
        .context("Failed to upload release metadata")?;
    info!("Uploaded metadata -> {}", url);
    Ok(url)
}

/// Publishes one release and records it at the head of the catalog.
///
/// The record is built and the resulting catalog validated before anything
/// is uploaded, so bad input never reaches storage. Uploads that succeed
/// before a later failure are not rolled back, but the catalog is either
/// fully updated or left as it was.
pub async fn publish_release(
    params: &ReleaseParams,
    publisher: &dyn AssetPublisher,
    store: &dyn CatalogStore,
    today: NaiveDate,
) -> Result<ReleaseRecord> {
    let required = params.require(today)?;

    let existing = store.load()?;
    if existing.find_release(&required.slug).is_some() {
        return Err(CatalogStoreError::DuplicateSlug(required.slug.clone()).into());
    }
    let catalog_id = generate_catalog_id(&existing, today);

    let musical_key = params.key.as_deref().filter(|k| !k.trim().is_empty());
    let layout = ReleaseStorageLayout::new(&required, musical_key);
    let checksum = checksum_md5(&required.audio)?;
    if !required.cover.is_file() {
        anyhow::bail!("Cover file not found: {}", required.cover.display());
    }

    let expected = build_release(
        params,
        today,
        catalog_id.clone(),
        PublishedAssets {
            audio_url: publisher.object_url(&layout.audio_key),
            cover_url: publisher.object_url(&layout.cover_key),
            checksum_md5: checksum.clone(),
        },
    )?;
    let mut preview = existing;
    append_release(&mut preview, expected)?;
    store.validate(&preview)?;

    info!("Uploading: {}", required.title);
    info!("Slug: {}", required.slug);
    info!("Catalog ID: {}", catalog_id);

    let audio_url = publish_file(publisher, &required.audio, &layout.audio_key)
        .await
        .with_context(|| format!("Failed to upload audio {}", required.audio.display()))?;
    let cover_url = publish_file(publisher, &required.cover, &layout.cover_key)
        .await
        .with_context(|| format!("Failed to upload cover {}", required.cover.display()))?;

    let mut release = build_release(
        params,
        today,
        catalog_id,
        PublishedAssets {
            audio_url,
            cover_url,
            checksum_md5: checksum,
        },
    )?;
    upload_metadata(publisher, &release, &layout.meta_key).await?;

    info!("Updating catalog...");
    let mut reissued = false;
    store.update(&mut |catalog: &mut Catalog| -> Result<()> {
        // Another publish may have landed since the id was picked.
        let current_id = generate_catalog_id(catalog, today);
        if current_id != release.catalog_id {
            warn!(
                "Catalog changed during upload, catalog id {} becomes {}",
                release.catalog_id, current_id
            );
            release.catalog_id = current_id;
            reissued = true;
        }
        append_release(catalog, release.clone())?;
        Ok(())
    })?;

    if reissued {
        upload_metadata(publisher, &release, &layout.meta_key).await?;
    }

    info!("Catalog updated with {}", release.catalog_id);
    Ok(release)
}
