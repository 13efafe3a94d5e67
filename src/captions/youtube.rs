//! Caption and metadata retrieval from YouTube's watch page.
//!
//! The watch page embeds a player response JSON blob containing the list of
//! caption tracks (`captionTracks`) and the video details (title, short
//! description). The track's `baseUrl` points at a timedtext XML document of
//! `<text start=".." dur="..">..</text>` entries.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{CaptionLine, CaptionSource, VideoInfo};
use crate::{Result, TranscriptError};

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Some caption endpoints refuse requests without a browser-looking agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

static TIMEDTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text start="([0-9.]+)"[^>]*>(.*?)</text>"#)
        .expect("timedtext pattern is valid")
});

static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

/// One entry of the watch page's `captionTracks` array.
#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Caption source backed by YouTube's public watch page.
pub struct YoutubeCaptionClient {
    http: reqwest::Client,
}

impl YoutubeCaptionClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;

        Ok(Self { http })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = url::Url::parse_with_params(WATCH_URL, &[("v", video_id)])
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;
        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(
                TranscriptError::FetchFailed(format!("HTTP {}", response.status())).into(),
            );
        }

        response
            .text()
            .await
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()).into())
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<String> {
        let response = self
            .http
            .get(&track.base_url)
            .send()
            .await
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(
                TranscriptError::FetchFailed(format!("HTTP {}", response.status())).into(),
            );
        }

        response
            .text()
            .await
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()).into())
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionClient {
    async fn fetch_captions(&self, video_id: &str, language: &str) -> Result<Vec<CaptionLine>> {
        let html = self.fetch_watch_page(video_id).await?;

        let tracks = extract_caption_tracks(&html)
            .ok_or_else(|| TranscriptError::TranscriptsDisabled(video_id.to_string()))?;

        let track = tracks
            .iter()
            .find(|t| t.language_code == language)
            .ok_or_else(|| TranscriptError::LanguageUnavailable(language.to_string()))?;

        tracing::debug!("Selected caption track: {}", track.base_url);
        let xml = self.fetch_track(track).await?;

        Ok(parse_timedtext(&xml))
    }

    async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo> {
        let html = self.fetch_watch_page(video_id).await?;

        let details_start = html
            .find("\"videoDetails\"")
            .ok_or_else(|| anyhow::anyhow!("No video details found for {}", video_id))?;
        let details = &html[details_start..];

        let title = extract_json_string_field(details, "title")
            .ok_or_else(|| anyhow::anyhow!("No title found for {}", video_id))?;
        let description = extract_json_string_field(details, "shortDescription")
            .unwrap_or_default();

        Ok(VideoInfo { title, description })
    }
}

/// Locate and deserialize the `captionTracks` array embedded in the watch
/// page. `None` means the page carries no caption section at all, which is
/// how YouTube presents videos with captions disabled.
fn extract_caption_tracks(html: &str) -> Option<Vec<CaptionTrack>> {
    let key_index = html.find("\"captionTracks\":")?;
    let rest = &html[key_index + "\"captionTracks\":".len()..];
    let array = extract_json_array(rest)?;

    serde_json::from_str(array).ok()
}

/// Slice the balanced JSON array starting at the first `[` of `input`,
/// tracking string and escape state so brackets inside track names don't
/// terminate the scan early.
fn extract_json_array(input: &str) -> Option<&str> {
    let start = input.find('[')?;
    let bytes = input.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'[' if !in_string => depth += 1,
            b']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract the value of `"key":"..."` as a decoded JSON string.
fn extract_json_string_field(json: &str, key: &str) -> Option<String> {
    let needle = format!("\"{}\":", key);
    let key_index = json.find(&needle)?;
    let rest = &json[key_index + needle.len()..];

    let quote = rest.find('"')?;
    let bytes = rest.as_bytes();
    let mut escaped = false;
    for i in (quote + 1)..bytes.len() {
        if escaped {
            escaped = false;
            continue;
        }
        match bytes[i] {
            b'\\' => escaped = true,
            b'"' => {
                // Hand the quoted slice to serde_json so escapes decode
                // exactly as the page intended.
                return serde_json::from_str(&rest[quote..=i]).ok();
            }
            _ => {}
        }
    }

    None
}

/// Parse timedtext XML into caption lines, dropping inline markup and
/// decoding HTML entities.
fn parse_timedtext(xml: &str) -> Vec<CaptionLine> {
    TIMEDTEXT_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let start: f64 = caps[1].parse().ok()?;
            let raw = MARKUP_RE.replace_all(&caps[2], "");
            // Track text arrives double-encoded (`&amp;#39;`), so decode twice.
            let text = unescape_entities(&unescape_entities(&raw));
            Some(CaptionLine { start, text })
        })
        .collect()
}

/// Decode the HTML entities timedtext documents use.
fn unescape_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let Some(semi) = tail.find(';') else {
            result.push_str(tail);
            return result;
        };

        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => decode_numeric_entity(entity),
        };

        match decoded {
            Some(c) => result.push(c),
            None => result.push_str(&tail[..=semi]),
        }
        rest = &tail[semi + 1..];
    }

    result.push_str(rest);
    result
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = entity.strip_prefix('#')?;
    let value = if let Some(hex) = code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        code.parse().ok()?
    };
    char::from_u32(value)
}
