//! Punctuation restoration and sentence segmentation.
//!
//! Punctuation restoration is delegated to an external model endpoint; the
//! sentence splitter and document formatter live here. The splitter is
//! heading-aware so the `#`/`##` lines the assembler produces stay on their
//! own, and it never yields empty strings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::normalize::capitalize_sentence;
use crate::{Result, TranscriptError};

/// Words a trailing period does not end a sentence after.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd",
    "e.g", "i.e", "a.m", "p.m", "u.s",
];

/// External punctuation-restoration capability.
///
/// Failure is fatal for the request once punctuation was asked for; there is
/// no fallback to unpunctuated output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Punctuator: Send + Sync {
    async fn restore_punctuation(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct PunctuateRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PunctuateResponse {
    text: String,
}

/// Punctuator backed by an HTTP inference endpoint, optionally pinned to a
/// specific model id.
pub struct RemotePunctuator {
    http: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl RemotePunctuator {
    pub fn new(endpoint: impl Into<String>, model: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model,
        }
    }
}

#[async_trait]
impl Punctuator for RemotePunctuator {
    async fn restore_punctuation(&self, text: &str) -> Result<String> {
        tracing::debug!("Requesting punctuation restoration from {}", self.endpoint);

        let request = PunctuateRequest {
            text,
            model: self.model.as_deref(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranscriptError::PunctuationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(
                TranscriptError::PunctuationFailed(format!("HTTP {}", response.status())).into(),
            );
        }

        let body: PunctuateResponse = response
            .json()
            .await
            .map_err(|e| TranscriptError::PunctuationFailed(e.to_string()))?;

        Ok(body.text)
    }
}

/// Split a transcript into sentences.
///
/// Blank-line-separated blocks are handled independently; a block starting
/// with a heading marker passes through as a single segment. Within prose
/// blocks, sentences end at `.`, `!` or `?` followed by whitespace (closing
/// quotes and brackets stay attached), except after known abbreviations and
/// single-letter initials. Empty segments are never produced.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for block in text.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        if block.starts_with('#') {
            sentences.push(block.to_string());
            continue;
        }
        split_block(block, &mut sentences);
    }

    sentences
}

fn split_block(block: &str, out: &mut Vec<String>) {
    let chars: Vec<(usize, char)> = block.char_indices().collect();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (idx, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j].1, '"' | '\'' | ')' | ']') {
                j += 1;
            }

            let at_end = j >= chars.len();
            let boundary = at_end || chars[j].1.is_whitespace();
            let abbreviation = c == '.' && ends_with_abbreviation(&block[start..=idx]);

            if boundary && !abbreviation {
                let end = if at_end { block.len() } else { chars[j].0 };
                let sentence = block[start..end].trim();
                if !sentence.is_empty() {
                    out.push(sentence.to_string());
                }

                while j < chars.len() && chars[j].1.is_whitespace() {
                    j += 1;
                }
                start = if j < chars.len() { chars[j].0 } else { block.len() };
                i = j;
                continue;
            }
        }
        i += 1;
    }

    let tail = block[start..].trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
}

/// `prefix` ends with a period; decide whether the word before it is an
/// abbreviation or a single-letter initial.
fn ends_with_abbreviation(prefix: &str) -> bool {
    let before_period = &prefix[..prefix.len() - 1];
    let word = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("");

    if word.len() == 1 && word.chars().all(char::is_alphabetic) {
        return true;
    }

    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Capitalize each sentence and join with blank-line separation into the
/// final document body.
pub fn format_document(sentences: &[String]) -> String {
    sentences
        .iter()
        .map(|s| capitalize_sentence(s))
        .collect::<Vec<_>>()
        .join("\n\n")
}
