use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

use crate::Result;

/// One timed unit of subtitle text with its start offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionLine {
    /// Start time in seconds
    pub start: f64,

    /// Raw caption text as delivered by the source
    pub text: String,
}

/// Title and description of a video, used for filename resolution and
/// chapter parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub description: String,
}

/// Trait for fetching caption tracks and video metadata.
///
/// The pipeline depends on this instead of a concrete client so tests can
/// substitute canned responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the ordered caption line sequence for a video in the given
    /// language.
    ///
    /// Fails with [`crate::TranscriptError::LanguageUnavailable`] when no
    /// track exists in that language, [`crate::TranscriptError::TranscriptsDisabled`]
    /// when the video has captions turned off, and
    /// [`crate::TranscriptError::FetchFailed`] for anything else.
    async fn fetch_captions(&self, video_id: &str, language: &str) -> Result<Vec<CaptionLine>>;

    /// Fetch the video's title and description. Best-effort: callers degrade
    /// to no title and no chapters when this fails.
    async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo>;
}
