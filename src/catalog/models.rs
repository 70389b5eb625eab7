//! Catalog document models.
//!
//! The JSON layout of these types is the contract shared with the web front
//! end, so field names and order must not change.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const CATALOG_VERSION: i64 = 1;

/// One published track.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub title: String,
    pub artist: String,
    pub slug: String,
    pub date: String,
    pub bpm: u32,
    pub key: String,
    pub mood: Vec<String>,
    pub genre: String,
    pub duration: String,
    pub cover_url: String,
    pub audio_mp3_url: String,
    pub audio_wav_url: String,
    pub tags: Vec<String>,
    pub description: String,
    pub catalog_id: String,
    pub checksum_md5: String,
}

/// The whole catalog document. `releases` is kept newest-first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: i64,
    pub updated_at: String,
    pub releases: Vec<ReleaseRecord>,
    #[serde(default)]
    pub sets: Vec<serde_json::Value>,
    #[serde(default)]
    pub playlists: Vec<serde_json::Value>,
    /// Top-level keys this tool does not know about, kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            version: CATALOG_VERSION,
            updated_at: now_timestamp(),
            releases: vec![],
            sets: vec![],
            playlists: vec![],
            extra: serde_json::Map::new(),
        }
    }
}

impl Catalog {
    pub fn find_release(&self, slug: &str) -> Option<&ReleaseRecord> {
        self.releases.iter().find(|r| r.slug == slug)
    }

    pub fn latest_release(&self) -> Option<&ReleaseRecord> {
        self.releases.first()
    }

    pub fn touch(&mut self) {
        self.updated_at = now_timestamp();
    }
}

/// Current UTC time as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn make_release(slug: &str, catalog_id: &str) -> ReleaseRecord {
        ReleaseRecord {
            title: format!("Title {}", slug),
            artist: "DeepPI".to_string(),
            slug: slug.to_string(),
            date: "2024-05-01".to_string(),
            bpm: 124,
            key: "A minor".to_string(),
            mood: vec!["dark".to_string()],
            genre: "Deep House".to_string(),
            duration: "05:12".to_string(),
            cover_url: format!("https://cdn.example.com/{}_cover.jpg", slug),
            audio_mp3_url: format!("https://cdn.example.com/{}.mp3", slug),
            audio_wav_url: "".to_string(),
            tags: vec!["late night".to_string()],
            description: "".to_string(),
            catalog_id: catalog_id.to_string(),
            checksum_md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
        }
    }
}
