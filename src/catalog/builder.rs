//! Assembly of a release record from operator input.

use super::ids::generate_slug;
use super::ReleaseRecord;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ARTIST: &str = "DeepPI";
pub const DEFAULT_KEY: &str = "Unknown";
pub const DEFAULT_DURATION: &str = "00:00";

const DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref SLUG_SHAPE: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
    static ref DURATION_SHAPE: Regex = Regex::new(r"^([0-9]{2}:)?[0-9]{2}:[0-9]{2}$").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Missing required parameter --{0}")]
    MissingParameter(&'static str),
    #[error("Invalid --bpm '{0}': expected a positive integer")]
    InvalidBpm(String),
    #[error("Invalid --date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Unsupported audio file '{0}': expected a .mp3 or .wav file")]
    UnsupportedAudioFormat(String),
    #[error("Title '{0}' does not produce a usable slug, pass --slug explicitly")]
    EmptySlug(String),
    #[error("Invalid --slug '{0}': use lowercase letters, digits and single hyphens")]
    InvalidSlug(String),
    #[error("Invalid --duration '{0}': expected MM:SS or HH:MM:SS")]
    InvalidDuration(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn from_path(path: &Path) -> Option<AudioFormat> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("mp3") {
            Some(AudioFormat::Mp3)
        } else if ext.eq_ignore_ascii_case("wav") {
            Some(AudioFormat::Wav)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::Wav => ".wav",
        }
    }
}

/// Raw operator input, one field per `--key value` pair.
#[derive(Clone, Debug, Default)]
pub struct ReleaseParams {
    pub audio: Option<String>,
    pub cover: Option<String>,
    pub title: Option<String>,
    pub bpm: Option<String>,
    pub genre: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub mood: Option<String>,
    pub duration: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
}

/// Required fields checked and resolved, plus the derived slug and date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredParams {
    pub audio: PathBuf,
    pub audio_format: AudioFormat,
    pub cover: PathBuf,
    pub title: String,
    pub bpm: u32,
    pub genre: String,
    pub slug: String,
    pub date: String,
}

/// What the publisher and checksum steps produced for a release.
#[derive(Clone, Debug, Default)]
pub struct PublishedAssets {
    pub audio_url: String,
    pub cover_url: String,
    pub checksum_md5: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn split_list(value: &Option<String>) -> Vec<String> {
    match non_empty(value) {
        None => vec![],
        Some(s) => s
            .split(',')
            .map(|piece| piece.trim())
            .filter(|piece| !piece.is_empty())
            .map(String::from)
            .collect(),
    }
}

impl ReleaseParams {
    /// Checks the required fields in declaration order, so the first missing
    /// one is the one reported.
    pub fn require(&self, today: NaiveDate) -> Result<RequiredParams, BuildError> {
        let audio = non_empty(&self.audio).ok_or(BuildError::MissingParameter("audio"))?;
        let cover = non_empty(&self.cover).ok_or(BuildError::MissingParameter("cover"))?;
        let title = non_empty(&self.title).ok_or(BuildError::MissingParameter("title"))?;
        let bpm = non_empty(&self.bpm).ok_or(BuildError::MissingParameter("bpm"))?;
        let genre = non_empty(&self.genre).ok_or(BuildError::MissingParameter("genre"))?;

        let bpm = match bpm.trim().parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => return Err(BuildError::InvalidBpm(bpm.to_string())),
        };

        let audio = PathBuf::from(audio);
        let audio_format = AudioFormat::from_path(&audio)
            .ok_or_else(|| BuildError::UnsupportedAudioFormat(audio.display().to_string()))?;

        let slug = match non_empty(&self.slug) {
            Some(slug) => slug.to_string(),
            None => generate_slug(title),
        };
        if slug.is_empty() {
            return Err(BuildError::EmptySlug(title.to_string()));
        }
        if !SLUG_SHAPE.is_match(&slug) {
            return Err(BuildError::InvalidSlug(slug));
        }

        if let Some(duration) = non_empty(&self.duration) {
            if !DURATION_SHAPE.is_match(duration) {
                return Err(BuildError::InvalidDuration(duration.to_string()));
            }
        }

        let date = match non_empty(&self.date) {
            Some(date) => NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
                .map_err(|_| BuildError::InvalidDate(date.to_string()))?,
            None => today,
        };

        Ok(RequiredParams {
            audio,
            audio_format,
            cover: PathBuf::from(cover),
            title: title.to_string(),
            bpm,
            genre: genre.to_string(),
            slug,
            date: date.format(DATE_FORMAT).to_string(),
        })
    }

    pub fn key_or_default(&self) -> &str {
        non_empty(&self.key).unwrap_or(DEFAULT_KEY)
    }
}

/// Builds the catalog entry for a release whose assets are already published.
///
/// Fails without producing anything if a required field is missing or
/// malformed.
pub fn build_release(
    params: &ReleaseParams,
    today: NaiveDate,
    catalog_id: String,
    assets: PublishedAssets,
) -> Result<ReleaseRecord, BuildError> {
    let required = params.require(today)?;

    let (audio_mp3_url, audio_wav_url) = match required.audio_format {
        AudioFormat::Mp3 => (assets.audio_url, String::new()),
        AudioFormat::Wav => (String::new(), assets.audio_url),
    };

    Ok(ReleaseRecord {
        title: required.title,
        artist: non_empty(&params.artist)
            .unwrap_or(DEFAULT_ARTIST)
            .to_string(),
        slug: required.slug,
        date: required.date,
        bpm: required.bpm,
        key: params.key_or_default().to_string(),
        mood: split_list(&params.mood),
        genre: required.genre,
        duration: non_empty(&params.duration)
            .unwrap_or(DEFAULT_DURATION)
            .to_string(),
        cover_url: assets.cover_url,
        audio_mp3_url,
        audio_wav_url,
        tags: split_list(&params.tags),
        description: params.description.clone().unwrap_or_default(),
        catalog_id,
        checksum_md5: assets.checksum_md5,
    })
}
