//! Chapter markers parsed from a video's description text.
//!
//! YouTube has no structured chapter API for this purpose; authors list
//! chapters as description lines like `0:00 Intro` or `1:02:30 - Closing`.
//! Parsing is line-by-line pattern matching and keeps chapters in order of
//! appearance. Timestamps are assumed non-decreasing but not verified.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A named video segment with its starting timestamp as written by the
/// author (`H:MM:SS` or `MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub timestamp: String,
    pub title: String,
}

/// A timestamp token at the start of a description line, optionally wrapped
/// in parentheses/brackets and separated from the title by `-`, `:` or
/// whitespace.
static CHAPTER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\(\[]?((?:\d{1,2}:)?\d{1,2}:\d{2})[\)\]]?\s*[-–:]?\s*(.+?)\s*$")
        .expect("chapter line pattern is valid")
});

/// Parse chapter markers out of a video description, one candidate per line.
/// Lines without a leading timestamp are ignored.
pub fn parse_description(description: &str) -> Vec<Chapter> {
    description
        .lines()
        .filter_map(|line| {
            CHAPTER_LINE_RE.captures(line).map(|caps| Chapter {
                timestamp: caps[1].to_string(),
                title: caps[2].to_string(),
            })
        })
        .collect()
}

/// Convert an `H:MM:SS` or `MM:SS` timestamp to elapsed seconds.
///
/// Colon-separated fields are interpreted as decreasing time units; anything
/// non-numeric or with more than three fields is an error.
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let fields: Vec<&str> = timestamp.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        anyhow::bail!("Malformed chapter timestamp: {}", timestamp);
    }

    let mut seconds = 0u64;
    for field in fields {
        let value: u64 = field
            .parse()
            .map_err(|_| anyhow::anyhow!("Malformed chapter timestamp: {}", timestamp))?;
        seconds = seconds * 60 + value;
    }

    Ok(seconds)
}
