//! Release announcements.

mod format;
mod telegram;

pub use format::{escape_html, format_release, hashtag, release_page_url, MAX_ANNOUNCED_TAGS};
pub use telegram::{TelegramClient, DEFAULT_TELEGRAM_API_URL};

use crate::catalog::ReleaseRecord;
use tracing::info;

/// Delivery side of announcements. Failures are reported as `false`, never
/// as errors, since announcing is best effort.
#[async_trait::async_trait]
pub trait Announcer: Send + Sync {
    /// Sends `text`, as the caption of `image_url` when one is given.
    async fn send(&self, text: &str, image_url: Option<&str>) -> bool;
}

/// Formats and sends the announcement for `release`, attaching the cover
/// when the release has one.
pub async fn announce_release(
    announcer: &dyn Announcer,
    release: &ReleaseRecord,
    site_url: &str,
) -> bool {
    info!("Announcing {} ({})", release.title, release.catalog_id);
    let message = format_release(release, site_url);
    let cover = Some(release.cover_url.as_str()).filter(|url| !url.is_empty());
    announcer.send(&message, cover).await
}
