//! Ordered fallback chain over transcript sources.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::Transcript;
use crate::config::Config;
use crate::error::TranscriptError;
use crate::scrape::YtDlpScrape;
use crate::youtube::{DirectCaptions, InnerTube, TrackListing};

/// One transcript source. Strategies classify their own failures; the
/// pipeline branches on the error kind, never on message text.
#[async_trait]
pub trait TranscriptStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, video_id: &str) -> Result<Transcript, TranscriptError>;
}

/// Strict-priority chain, short-circuiting on first success.
///
/// `UpstreamBlocked` from an early stage advances to the scrape stage
/// (that stage exists for the blocked case), but is remembered: if no
/// stage succeeds, a blocked chain surfaces `UpstreamBlocked` rather
/// than whatever the last stage happened to fail with.
pub struct AcquisitionPipeline {
    strategies: Vec<Box<dyn TranscriptStrategy>>,
}

impl AcquisitionPipeline {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        let inner = Arc::new(InnerTube::new(client.clone()));
        let strategies: Vec<Box<dyn TranscriptStrategy>> = vec![
            Box::new(DirectCaptions::new(inner.clone(), config.preferred_lang.clone())),
            Box::new(TrackListing::new(inner, config.preferred_lang.clone())),
            Box::new(YtDlpScrape::new(
                client,
                config.preferred_lang.clone(),
                config.cookies.clone(),
            )),
        ];
        AcquisitionPipeline { strategies }
    }

    pub fn from_strategies(strategies: Vec<Box<dyn TranscriptStrategy>>) -> Self {
        AcquisitionPipeline { strategies }
    }

    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
        if video_id.is_empty() {
            return Err(TranscriptError::InvalidVideoId);
        }

        let mut blocked = false;
        let mut last_err = None;

        for strategy in &self.strategies {
            match strategy.attempt(video_id).await {
                Ok(transcript) => {
                    info!(
                        "Transcript for {video_id} acquired via {} ({} lines, lang={})",
                        strategy.name(),
                        transcript.lines.len(),
                        transcript.language,
                    );
                    return Ok(transcript);
                }
                Err(e) => {
                    debug!("Strategy {} failed for {video_id}: {e}", strategy.name());
                    if e.is_blocked() {
                        blocked = true;
                    }
                    last_err = Some(e);
                }
            }
        }

        if blocked {
            return Err(TranscriptError::UpstreamBlocked);
        }
        Err(last_err.unwrap_or(TranscriptError::NoTranscriptAvailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TranscriptLine, TranscriptSource};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Outcome {
        Success,
        NoTranscript,
        Blocked,
    }

    struct StubStrategy {
        name: &'static str,
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    impl StubStrategy {
        fn boxed(name: &'static str, outcome: Outcome, calls: Arc<AtomicUsize>) -> Box<dyn TranscriptStrategy> {
            Box::new(StubStrategy { name, outcome, calls })
        }
    }

    #[async_trait]
    impl TranscriptStrategy for StubStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn attempt(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Success => Ok(Transcript {
                    video_id: video_id.to_string(),
                    language: "en".to_string(),
                    source: TranscriptSource::Captions,
                    lines: vec![TranscriptLine::bare(format!("from {}", self.name))],
                }),
                Outcome::NoTranscript => Err(TranscriptError::NoTranscriptAvailable),
                Outcome::Blocked => Err(TranscriptError::UpstreamBlocked),
            }
        }
    }

    #[tokio::test]
    async fn test_short_circuits_on_first_success() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let pipeline = AcquisitionPipeline::from_strategies(vec![
            StubStrategy::boxed("first", Outcome::Success, first.clone()),
            StubStrategy::boxed("second", Outcome::Success, second.clone()),
        ]);

        let t = pipeline.fetch_transcript("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(t.text(), "from first");
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_advances_past_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AcquisitionPipeline::from_strategies(vec![
            StubStrategy::boxed("first", Outcome::NoTranscript, calls.clone()),
            StubStrategy::boxed("second", Outcome::Success, calls.clone()),
        ]);

        let t = pipeline.fetch_transcript("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(t.text(), "from second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blocked_dominates_final_error() {
        // A blocked primary source must surface UpstreamBlocked even when a
        // later stage fails with a different classification.
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AcquisitionPipeline::from_strategies(vec![
            StubStrategy::boxed("first", Outcome::Blocked, calls.clone()),
            StubStrategy::boxed("second", Outcome::NoTranscript, calls.clone()),
        ]);

        let err = pipeline.fetch_transcript("dQw4w9WgXcQ").await.unwrap_err();
        assert!(err.is_blocked());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_transcript_anywhere() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AcquisitionPipeline::from_strategies(vec![
            StubStrategy::boxed("first", Outcome::NoTranscript, calls.clone()),
            StubStrategy::boxed("second", Outcome::NoTranscript, calls.clone()),
        ]);

        let err = pipeline.fetch_transcript("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, TranscriptError::NoTranscriptAvailable));
    }

    #[tokio::test]
    async fn test_empty_video_id_rejected_before_strategies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AcquisitionPipeline::from_strategies(vec![StubStrategy::boxed(
            "first",
            Outcome::Success,
            calls.clone(),
        )]);

        let err = pipeline.fetch_transcript("").await.unwrap_err();
        assert!(matches!(err, TranscriptError::InvalidVideoId));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
