//! Object keys for the files of one release.
//!
//! `releases/<year>/<bpm>bpm_<key>_<genre>/<slug>/{audio,cover,meta}/...`

use crate::catalog::RequiredParams;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseStorageLayout {
    pub base: String,
    pub audio_key: String,
    pub cover_key: String,
    pub meta_key: String,
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

impl ReleaseStorageLayout {
    /// `musical_key` is the operator-supplied key, if any; the folder name
    /// uses `unknown` when it is absent.
    pub fn new(required: &RequiredParams, musical_key: Option<&str>) -> Self {
        let year = required.date.split('-').next().unwrap_or_default();
        let key = strip_whitespace(musical_key.unwrap_or("unknown"));
        let genre = strip_whitespace(&required.genre).to_lowercase();
        let base = format!(
            "releases/{}/{}bpm_{}_{}/{}",
            year, required.bpm, key, genre, required.slug
        );

        let slug = &required.slug;
        ReleaseStorageLayout {
            audio_key: format!(
                "{}/audio/{}{}",
                base,
                slug,
                required.audio_format.extension()
            ),
            cover_key: format!("{}/cover/{}_cover.jpg", base, slug),
            meta_key: format!("{}/meta/{}.json", base, slug),
            base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReleaseParams;
    use chrono::NaiveDate;

    fn required(key: Option<&str>) -> (RequiredParams, ReleaseParams) {
        let params = ReleaseParams {
            audio: Some("/tmp/track.wav".to_string()),
            cover: Some("/tmp/art.jpg".to_string()),
            title: Some("Night Drift".to_string()),
            bpm: Some("128".to_string()),
            genre: Some("Deep House".to_string()),
            date: Some("2024-09-01".to_string()),
            key: key.map(String::from),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        (params.require(today).unwrap(), params)
    }

    #[test]
    fn test_layout_without_key() {
        let (required, _) = required(None);
        let layout = ReleaseStorageLayout::new(&required, None);
        assert_eq!(
            layout.base,
            "releases/2024/128bpm_unknown_deephouse/night-drift"
        );
        assert_eq!(
            layout.audio_key,
            "releases/2024/128bpm_unknown_deephouse/night-drift/audio/night-drift.wav"
        );
        assert_eq!(
            layout.cover_key,
            "releases/2024/128bpm_unknown_deephouse/night-drift/cover/night-drift_cover.jpg"
        );
        assert_eq!(
            layout.meta_key,
            "releases/2024/128bpm_unknown_deephouse/night-drift/meta/night-drift.json"
        );
    }

    #[test]
    fn test_layout_keeps_key_case_but_strips_spaces() {
        let (required, params) = required(Some("A minor"));
        let layout = ReleaseStorageLayout::new(&required, params.key.as_deref());
        assert_eq!(layout.base, "releases/2024/128bpm_Aminor_deephouse/night-drift");
    }
}
