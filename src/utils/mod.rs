use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Result, TranscriptError};

/// Matches the two canonical YouTube URL shapes and captures the 11-character
/// video id: `youtube.com/watch?v=<id>` and `youtu.be/<id>`.
static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/.*?[?&]v=|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("video id pattern is valid")
});

/// Extract the 11-character video id from a YouTube URL.
///
/// Accepts both `https://www.youtube.com/watch?v=XXXXXXXXXXX` and
/// `https://youtu.be/XXXXXXXXXXX` forms; anything without a recognizable id
/// fails with [`TranscriptError::InvalidUrl`].
pub fn parse_video_id(url: &str) -> Result<String> {
    VIDEO_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| TranscriptError::InvalidUrl(url.to_string()).into())
}

/// Sanitize a title or id for safe filesystem usage.
///
/// Keeps alphanumerics, underscores, whitespace, dots, hyphens, and
/// brackets/parentheses; strips everything else and trims the result.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '_' | '.' | '-' | '(' | ')' | '[' | ']')
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Format a duration in human-readable form for log output.
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_id_watch_url() {
        let id = parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_parse_video_id_short_url() {
        let id = parse_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_parse_video_id_extra_query_params() {
        let id = parse_video_id("https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ&t=30")
            .unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_parse_video_id_rejects_garbage() {
        assert!(parse_video_id("not a url").is_err());
        assert!(parse_video_id("https://vimeo.com/123456789").is_err());
        assert!(parse_video_id("https://youtu.be/short").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World!"), "Hello World");
        assert_eq!(sanitize_filename("a/b:c?d"), "abcd");
        assert_eq!(sanitize_filename("Talk [part 1] (final)"), "Talk [part 1] (final)");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
    }
}
