//! Test fixture creation
//!
//! Builds release inputs and catalog files inside a temp directory.

#![allow(dead_code)]

use super::constants::*;
use deeppi_catalog::{Catalog, ReleaseParams, ReleaseRecord};
use std::path::{Path, PathBuf};

/// Writes a small audio file and a cover next to each other and returns the
/// params for a "Night Drift" release using them.
pub fn release_inputs(dir: &Path, audio_name: &str) -> ReleaseParams {
    let audio = dir.join(audio_name);
    let cover = dir.join("cover.jpg");
    std::fs::write(&audio, b"RIFF\x24\x00\x00\x00WAVEfmt ").expect("Failed to write audio");
    std::fs::write(&cover, b"\xff\xd8\xff\xe0").expect("Failed to write cover");

    ReleaseParams {
        audio: Some(audio.to_string_lossy().to_string()),
        cover: Some(cover.to_string_lossy().to_string()),
        title: Some("Night Drift".to_string()),
        bpm: Some("128".to_string()),
        genre: Some("Deep House".to_string()),
        ..Default::default()
    }
}

/// A schema-valid release record.
pub fn sample_release(slug: &str, catalog_id: &str, date: &str) -> ReleaseRecord {
    ReleaseRecord {
        title: slug.replace('-', " "),
        artist: "DeepPI".to_string(),
        slug: slug.to_string(),
        date: date.to_string(),
        bpm: 122,
        key: "F minor".to_string(),
        mood: vec!["warm".to_string()],
        genre: "Deep House".to_string(),
        duration: "06:01".to_string(),
        cover_url: format!("{}/covers/{}.jpg", CDN_BASE_URL, slug),
        audio_mp3_url: format!("{}/audio/{}.mp3", CDN_BASE_URL, slug),
        audio_wav_url: String::new(),
        tags: vec!["sunrise".to_string()],
        description: String::new(),
        catalog_id: catalog_id.to_string(),
        checksum_md5: EMPTY_MD5.to_string(),
    }
}

/// Writes `releases` as a catalog document at `dir/catalog.json`.
pub fn write_catalog(dir: &Path, releases: Vec<ReleaseRecord>) -> PathBuf {
    let catalog = Catalog {
        releases,
        ..Default::default()
    };
    let path = dir.join("catalog.json");
    let json = serde_json::to_string_pretty(&catalog).expect("Failed to serialize catalog");
    std::fs::write(&path, json).expect("Failed to write catalog");
    path
}
