//! Release announcement text, in Telegram's HTML flavour.

use crate::catalog::ReleaseRecord;

/// Tags beyond this many are left out of the announcement.
pub const MAX_ANNOUNCED_TAGS: usize = 5;

const TRAILING_HASHTAGS: &str = "#DeepPI #NewRelease";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `#` followed by the text with all whitespace removed.
pub fn hashtag(s: &str) -> String {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    format!("#{}", escape_html(&compact))
}

fn link(url: &str, label: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape_html(url), label)
}

pub fn release_page_url(site_url: &str, slug: &str) -> String {
    format!("{}/release/{}", site_url.trim_end_matches('/'), slug)
}

/// Renders the announcement for one release.
pub fn format_release(release: &ReleaseRecord, site_url: &str) -> String {
    let mut sections = vec![];

    sections.push(format!(
        "🎵 <b>{}</b> ({} BPM • {})",
        escape_html(&release.title),
        release.bpm,
        escape_html(&release.key)
    ));

    let mut labels: Vec<String> = release.mood.iter().map(|m| hashtag(m)).collect();
    labels.push(hashtag(&release.genre));
    sections.push(format!("🏷️ {}", labels.join(" ")));

    if !release.description.trim().is_empty() {
        sections.push(escape_html(release.description.trim()));
    }

    let mut links = format!(
        "▶️ {}",
        link(&release_page_url(site_url, &release.slug), "Stream")
    );
    if !release.audio_mp3_url.is_empty() {
        links.push_str(&format!(
            " | ⬇️ {}",
            link(&release.audio_mp3_url, "Download MP3")
        ));
    }
    if !release.audio_wav_url.is_empty() {
        links.push_str(&format!(
            " | ⬇️ {}",
            link(&release.audio_wav_url, "Download WAV")
        ));
    }
    sections.push(links);

    let mut footer: Vec<String> = release
        .tags
        .iter()
        .take(MAX_ANNOUNCED_TAGS)
        .map(|t| hashtag(t))
        .collect();
    footer.push(TRAILING_HASHTAGS.to_string());
    sections.push(footer.join(" "));

    sections.join("\n\n")
}
