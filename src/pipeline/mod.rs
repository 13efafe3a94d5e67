//! The transcript pipeline: one request in, one formatted document out.
//!
//! Every front-end (CLI, web form, HTTP API) delegates here. The pipeline
//! resolves the video id, fetches captions, fetches metadata best-effort,
//! assembles the cleaned text with chapter headings, optionally restores
//! punctuation, and formats the sentence list into the final document.

use serde::{Deserialize, Serialize};

use crate::captions::{youtube::YoutubeCaptionClient, CaptionLine, CaptionSource};
use crate::chapters::{self, Chapter};
use crate::config::Config;
use crate::segment::{self, Punctuator, RemotePunctuator};
use crate::{normalize, utils, Result};

/// Captions within this many seconds before a chapter's start still trigger
/// its heading; caption timing rarely lines up exactly with author-supplied
/// chapter marks.
const CHAPTER_BUFFER_SECS: u64 = 2;

/// One transcript generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRequest {
    /// YouTube video URL
    pub url: String,

    /// Caption track language code
    pub language: String,

    /// Restore punctuation through the configured model endpoint
    pub punctuate: bool,

    /// Explicit filename override (without extension)
    pub filename: Option<String>,
}

/// The finished transcript document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub video_id: String,

    /// Video title when the metadata fetch succeeded
    pub title: Option<String>,

    /// Markdown body: optional headings plus blank-line-separated sentences
    pub body: String,
}

/// Ties caption fetching, normalization, punctuation, and formatting
/// together. Holds trait objects so tests can substitute both external
/// collaborators.
pub struct TranscriptPipeline {
    source: Box<dyn CaptionSource>,
    punctuator: Box<dyn Punctuator>,
}

impl TranscriptPipeline {
    /// Create a pipeline from configuration. `model_override` pins the
    /// punctuation model for this pipeline instead of the configured one.
    pub fn new(config: &Config, model_override: Option<String>) -> Result<Self> {
        let model = model_override.or_else(|| config.transcript.punctuation_model.clone());
        let punctuator =
            RemotePunctuator::new(config.transcript.punctuation_endpoint.clone(), model);

        Ok(Self {
            source: Box::new(YoutubeCaptionClient::new()?),
            punctuator: Box::new(punctuator),
        })
    }

    /// Create a pipeline with explicit collaborators.
    pub fn with_collaborators(
        source: Box<dyn CaptionSource>,
        punctuator: Box<dyn Punctuator>,
    ) -> Self {
        Self { source, punctuator }
    }

    /// Run the full pipeline for one request.
    pub async fn generate(&self, request: &TranscriptRequest) -> Result<TranscriptDocument> {
        let video_id = utils::parse_video_id(&request.url)?;

        tracing::info!("Fetching captions for video {} ({})", video_id, request.language);
        let lines = self
            .source
            .fetch_captions(&video_id, &request.language)
            .await?;
        tracing::info!("Fetched {} caption lines", lines.len());
        if let Some(last) = lines.last() {
            tracing::debug!("Caption track spans {}", utils::format_duration(last.start));
        }

        // Metadata is best-effort: a failure here degrades to no title and
        // no chapters instead of aborting the request.
        let info = match self.source.fetch_video_info(&video_id).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Metadata fetch failed, continuing without title/chapters: {}", e);
                None
            }
        };

        let title = info
            .as_ref()
            .map(|i| i.title.clone())
            .filter(|t| !t.is_empty());
        let chapter_list = info
            .as_ref()
            .map(|i| chapters::parse_description(&i.description))
            .unwrap_or_default();
        if !chapter_list.is_empty() {
            tracing::info!("Found {} chapters in the video description", chapter_list.len());
        }

        let assembled = assemble(&lines, title.as_deref(), &chapter_list);

        let text = if request.punctuate {
            tracing::info!("Restoring punctuation...");
            let punctuated = self.punctuator.restore_punctuation(&assembled).await?;
            normalize::strip_heading_periods(&punctuated)
        } else {
            assembled
        };

        let sentences = segment::split_sentences(&text);
        let body = segment::format_document(&sentences);

        Ok(TranscriptDocument {
            video_id,
            title,
            body,
        })
    }
}

/// Concatenate normalized caption lines into one text blob, interleaving
/// chapter headings by timestamp.
///
/// The chapter cursor only moves forward: each chapter is emitted at most
/// once, at the first caption line whose start time crosses its threshold.
/// Chapters whose threshold is never crossed stay unemitted. A chapter with
/// a malformed timestamp is logged and skipped without advancing the cursor.
pub fn assemble(lines: &[CaptionLine], title: Option<&str>, chapter_list: &[Chapter]) -> String {
    let mut transcript = String::new();

    if let Some(title) = title {
        transcript.push_str("# ");
        transcript.push_str(title);
        transcript.push_str("\n\n");
    }

    let mut cursor = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let start = line.start.floor() as u64;

        if let Some(chapter) = chapter_list.get(cursor) {
            match chapters::parse_timestamp(&chapter.timestamp) {
                Ok(chapter_start) => {
                    if start + CHAPTER_BUFFER_SECS >= chapter_start {
                        transcript.push_str("\n\n## ");
                        transcript.push_str(&chapter.title);
                        transcript.push_str("\n\n");
                        cursor += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping chapter '{}': {}", chapter.title, e);
                }
            }
        }

        let text = normalize::clean_caption_text(&line.text);
        if !text.is_empty() {
            transcript.push_str(text.trim());
            transcript.push(' ');
        }

        if i % 100 == 0 {
            tracing::debug!("Processed {} lines out of {}", i, lines.len());
        }
    }

    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::{MockCaptionSource, VideoInfo};
    use crate::segment::MockPunctuator;
    use crate::TranscriptError;

    fn line(start: f64, text: &str) -> CaptionLine {
        CaptionLine {
            start,
            text: text.to_string(),
        }
    }

    fn request(url: &str, punctuate: bool) -> TranscriptRequest {
        TranscriptRequest {
            url: url.to_string(),
            language: "en".to_string(),
            punctuate,
            filename: None,
        }
    }

    #[test]
    fn test_assemble_cleans_and_orders() {
        let lines = vec![
            line(0.0, "[music]"),
            line(5.0, ">> hello"),
            line(10.0, "world\\n"),
        ];
        assert_eq!(assemble(&lines, None, &[]), "hello world ");
    }

    #[test]
    fn test_assemble_emits_chapter_once() {
        let lines = vec![line(6.0, "first"), line(12.0, "second")];
        let chapter_list = vec![Chapter {
            timestamp: "0:05".into(),
            title: "Intro".into(),
        }];

        let assembled = assemble(&lines, None, &chapter_list);
        assert_eq!(assembled, "\n\n## Intro\n\nfirst second ");
        assert_eq!(assembled.matches("## Intro").count(), 1);
    }

    #[test]
    fn test_assemble_chapter_buffer_window() {
        // 3s caption is within the 2-second buffer of a 5s chapter.
        let lines = vec![line(3.0, "early")];
        let chapter_list = vec![Chapter {
            timestamp: "0:05".into(),
            title: "Intro".into(),
        }];
        assert!(assemble(&lines, None, &chapter_list).starts_with("\n\n## Intro\n\n"));
    }

    #[test]
    fn test_assemble_title_heading() {
        let lines = vec![line(0.0, "hi")];
        assert_eq!(assemble(&lines, Some("My Video"), &[]), "# My Video\n\nhi ");
    }

    #[test]
    fn test_assemble_skips_malformed_chapter_without_advancing() {
        let lines = vec![line(10.0, "a"), line(20.0, "b")];
        let chapter_list = vec![
            Chapter {
                timestamp: "bogus".into(),
                title: "Broken".into(),
            },
            Chapter {
                timestamp: "0:15".into(),
                title: "Never reached".into(),
            },
        ];

        let assembled = assemble(&lines, None, &chapter_list);
        assert!(!assembled.contains("Broken"));
        assert!(!assembled.contains("Never reached"));
        assert_eq!(assembled, "a b ");
    }

    #[test]
    fn test_assemble_trailing_chapters_unemitted() {
        let lines = vec![line(0.0, "only line")];
        let chapter_list = vec![
            Chapter {
                timestamp: "0:00".into(),
                title: "Start".into(),
            },
            Chapter {
                timestamp: "10:00".into(),
                title: "Way later".into(),
            },
        ];

        let assembled = assemble(&lines, None, &chapter_list);
        assert!(assembled.contains("## Start"));
        assert!(!assembled.contains("Way later"));
    }

    #[tokio::test]
    async fn test_generate_unpunctuated() {
        let mut source = MockCaptionSource::new();
        source.expect_fetch_captions().returning(|_, _| {
            Ok(vec![
                line(0.0, "hello everyone."),
                line(4.0, "welcome back."),
            ])
        });
        source.expect_fetch_video_info().returning(|_| {
            Ok(VideoInfo {
                title: "My Video".into(),
                description: "0:00 Intro".into(),
            })
        });

        let mut punctuator = MockPunctuator::new();
        punctuator.expect_restore_punctuation().never();

        let pipeline =
            TranscriptPipeline::with_collaborators(Box::new(source), Box::new(punctuator));
        let doc = pipeline
            .generate(&request("https://youtu.be/dQw4w9WgXcQ", false))
            .await
            .unwrap();

        assert_eq!(doc.video_id, "dQw4w9WgXcQ");
        assert_eq!(doc.title.as_deref(), Some("My Video"));
        assert_eq!(
            doc.body,
            "# My Video\n\n## Intro\n\nHello everyone.\n\nWelcome back."
        );
    }

    #[tokio::test]
    async fn test_generate_punctuated_strips_heading_periods() {
        let mut source = MockCaptionSource::new();
        source
            .expect_fetch_captions()
            .returning(|_, _| Ok(vec![line(0.0, "hello everyone welcome back")]));
        source.expect_fetch_video_info().returning(|_| {
            Ok(VideoInfo {
                title: "My Video".into(),
                description: String::new(),
            })
        });

        let mut punctuator = MockPunctuator::new();
        punctuator
            .expect_restore_punctuation()
            .returning(|_| Ok("#. My Video\n\nhello everyone. welcome back.".to_string()));

        let pipeline =
            TranscriptPipeline::with_collaborators(Box::new(source), Box::new(punctuator));
        let doc = pipeline
            .generate(&request("https://youtu.be/dQw4w9WgXcQ", true))
            .await
            .unwrap();

        assert_eq!(
            doc.body,
            "# My Video\n\nHello everyone.\n\nWelcome back."
        );
    }

    #[tokio::test]
    async fn test_generate_invalid_url() {
        let pipeline = TranscriptPipeline::with_collaborators(
            Box::new(MockCaptionSource::new()),
            Box::new(MockPunctuator::new()),
        );

        let err = pipeline
            .generate(&request("https://example.com/nothing", false))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptError>(),
            Some(TranscriptError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_language_unavailable() {
        let mut source = MockCaptionSource::new();
        source.expect_fetch_captions().returning(|_, language| {
            Err(TranscriptError::LanguageUnavailable(language.to_string()).into())
        });
        source.expect_fetch_video_info().never();

        let pipeline = TranscriptPipeline::with_collaborators(
            Box::new(source),
            Box::new(MockPunctuator::new()),
        );

        let err = pipeline
            .generate(&request("https://youtu.be/dQw4w9WgXcQ", false))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptError>(),
            Some(TranscriptError::LanguageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_metadata_failure_degrades() {
        let mut source = MockCaptionSource::new();
        source
            .expect_fetch_captions()
            .returning(|_, _| Ok(vec![line(0.0, "some words.")]));
        source
            .expect_fetch_video_info()
            .returning(|_| Err(anyhow::anyhow!("metadata endpoint down")));

        let pipeline = TranscriptPipeline::with_collaborators(
            Box::new(source),
            Box::new(MockPunctuator::new()),
        );
        let doc = pipeline
            .generate(&request("https://youtu.be/dQw4w9WgXcQ", false))
            .await
            .unwrap();

        assert_eq!(doc.title, None);
        assert_eq!(doc.body, "Some words.");
    }

    #[tokio::test]
    async fn test_generate_punctuation_failure_is_fatal() {
        let mut source = MockCaptionSource::new();
        source
            .expect_fetch_captions()
            .returning(|_, _| Ok(vec![line(0.0, "words")]));
        source
            .expect_fetch_video_info()
            .returning(|_| Ok(VideoInfo::default()));

        let mut punctuator = MockPunctuator::new();
        punctuator
            .expect_restore_punctuation()
            .returning(|_| Err(TranscriptError::PunctuationFailed("model offline".into()).into()));

        let pipeline =
            TranscriptPipeline::with_collaborators(Box::new(source), Box::new(punctuator));
        let err = pipeline
            .generate(&request("https://youtu.be/dQw4w9WgXcQ", true))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptError>(),
            Some(TranscriptError::PunctuationFailed(_))
        ));
    }
}
