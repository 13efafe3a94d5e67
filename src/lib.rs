//! Tubescript - fetch a YouTube video's caption track and turn it into a
//! readable Markdown transcript.
//!
//! The library cleans caption text, optionally restores punctuation through an
//! external model endpoint, splits the result into sentences, aligns chapter
//! headings from the video description, and writes the document to disk. The
//! CLI and the HTTP server are thin adapters over the same [`pipeline`].

pub mod captions;
pub mod chapters;
pub mod cli;
pub mod config;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod segment;
pub mod server;
pub mod utils;

pub use captions::{CaptionLine, CaptionSource, VideoInfo};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use pipeline::{TranscriptDocument, TranscriptPipeline, TranscriptRequest};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to transcript generation
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("No caption track available for language '{0}'")]
    LanguageUnavailable(String),

    #[error("Captions are disabled for video '{0}'")]
    TranscriptsDisabled(String),

    #[error("Caption fetch failed: {0}")]
    FetchFailed(String),

    #[error("Punctuation restoration failed: {0}")]
    PunctuationFailed(String),

    #[error("Failed to persist transcript: {0}")]
    PersistFailed(String),
}
