//! Pure text transforms applied to caption lines and punctuated transcripts.
//!
//! Caption tracks carry artifacts that read badly in prose: bracketed stage
//! directions like `[music]`, literal escape tokens (`\n`, `\t`, ...) left
//! over from the source encoding, and `>>` speaker-change markers. Every
//! function here is a total transform over any input string.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bracketed stage directions, non-greedy so `[music] hi [applause]` keeps
/// the text between them.
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("tag pattern is valid"));

/// Literal two-character escape tokens carried over as text, not actual
/// control characters.
static ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[nrtb]|\\r\n").expect("escape pattern is valid"));

/// A period glued onto a Markdown heading marker by punctuation restoration.
static HEADING_PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(##?)\.").expect("heading period pattern is valid"));

/// Clean one caption line's text: strip stage directions, literal escape
/// tokens, and `>>` speaker markers.
pub fn clean_caption_text(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, "");
    let without_escapes = ESCAPE_RE.replace_all(&without_tags, "");
    without_escapes.replace(">>", "")
}

/// Remove any period immediately following a `#` or `##` heading marker.
///
/// The punctuation model sees heading markers as sentence boundaries and
/// appends a period to them; this undoes that before sentence splitting.
pub fn strip_heading_periods(text: &str) -> String {
    HEADING_PERIOD_RE.replace_all(text, "$1").into_owned()
}

/// Uppercase the first character of a sentence, leaving the rest untouched.
pub fn capitalize_sentence(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_bracketed_tags() {
        assert_eq!(clean_caption_text("[music]"), "");
        assert_eq!(clean_caption_text("[music] hello [applause]"), " hello ");
        assert_eq!(clean_caption_text("no tags here"), "no tags here");
    }

    #[test]
    fn test_removes_literal_escape_tokens() {
        assert_eq!(clean_caption_text(r"world\n"), "world");
        assert_eq!(clean_caption_text(r"a\tb\rc\bd"), "abcd");
        assert_eq!(clean_caption_text("line\\r\\nnext"), "linenext");
    }

    #[test]
    fn test_removes_speaker_markers() {
        assert_eq!(clean_caption_text(">> hello"), " hello");
        assert_eq!(clean_caption_text(">> A >> B"), " A  B");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "[music] >> hello\\n world",
            ">>>",
            "[[nested] tag]",
            "plain text",
            r"\r\n\t\b",
        ];
        for sample in samples {
            let once = clean_caption_text(sample);
            let twice = clean_caption_text(&once);
            assert_eq!(once, twice, "normalizing twice diverged for {:?}", sample);
        }
    }

    #[test]
    fn test_strip_heading_periods() {
        assert_eq!(strip_heading_periods("##. Intro"), "## Intro");
        assert_eq!(strip_heading_periods("#. Title"), "# Title");
        assert_eq!(strip_heading_periods("a sentence. another"), "a sentence. another");
    }

    #[test]
    fn test_capitalize_sentence() {
        assert_eq!(capitalize_sentence("hello world"), "Hello world");
        assert_eq!(capitalize_sentence("Already"), "Already");
        assert_eq!(capitalize_sentence(""), "");
        assert_eq!(capitalize_sentence("éclair time"), "Éclair time");
    }
}
