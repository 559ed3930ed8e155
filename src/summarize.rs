//! Degradation-aware summarization over an acquired transcript.
//!
//! Three modes: `simple` never touches the AI, `fast` makes one bounded
//! call and degrades to the extractive summary on any failure, `complete`
//! map-reduces 800-word windows and degrades per the quota rules: a window
//! quota failure reverts to the extractive summary of the original
//! transcript, a final-synthesis quota failure keeps the window summaries
//! as a partial result.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use crate::chunk::{DEFAULT_WINDOW_WORDS, truncate_words, word_count, word_windows};
use crate::error::{AiError, SummarizeError};
use crate::gemini::{FAST_PARAMS, SYNTHESIS_PARAMS, TextGenerator, WINDOW_PARAMS};

/// Word budget for the fast path's single AI call.
const FAST_WORD_LIMIT: usize = 500;
/// At or below this many words, complete mode delegates to fast.
const COMPLETE_DELEGATION_WORDS: usize = 1000;

const MIN_SENTENCE_BULLETS: usize = 5;
const MAX_SENTENCE_CANDIDATES: usize = 10;
const MAX_BULLETS: usize = 15;
const SUPPLEMENT_CHUNK_WORDS: usize = 20;
const SUPPLEMENT_WORD_LIMIT: usize = 200;

/// Which orchestration path to take. Parsed case-insensitively; anything
/// unrecognized is the fast default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    Simple,
    #[default]
    Fast,
    Complete,
}

impl SummaryMode {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "simple" => SummaryMode::Simple,
            "complete" => SummaryMode::Complete,
            _ => SummaryMode::Fast,
        }
    }
}

/// A successful summary. Serialized as `{summary, type, note?}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub summary: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

pub struct Summarizer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Summarizer {
    /// A missing generator (no API key at startup) permanently degrades
    /// every AI path to the extractive fallback.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Summarizer { generator }
    }

    pub async fn summarize(&self, mode: SummaryMode, transcript_text: &str) -> Result<Summary, SummarizeError> {
        match mode {
            SummaryMode::Simple => self.simple(transcript_text),
            SummaryMode::Fast => self.fast(transcript_text).await,
            SummaryMode::Complete => self.complete(transcript_text).await,
        }
    }

    /// Guaranteed free/fast path: extractive even when AI is available.
    fn simple(&self, transcript_text: &str) -> Result<Summary, SummarizeError> {
        let mut summary = extractive_summary(transcript_text)?;
        summary.note = Some("📝 Simple summary (no AI used).".to_string());
        Ok(summary)
    }

    async fn fast(&self, transcript_text: &str) -> Result<Summary, SummarizeError> {
        let cleaned = transcript_text.trim();
        if cleaned.is_empty() {
            return Err(SummarizeError::EmptyTranscript);
        }

        let total_words = word_count(cleaned);
        let (truncated, was_truncated) = truncate_words(cleaned, FAST_WORD_LIMIT);
        let note = was_truncated.then(|| {
            format!(
                "Video was long ({total_words} words), summarized first {FAST_WORD_LIMIT} words for ultra-fast processing."
            )
        });

        let Some(generator) = &self.generator else {
            return extractive_summary(cleaned);
        };

        let prompt = format!("Summarize this video transcript in 15 bullet points:\n{truncated}");
        match generator.generate(&prompt, &FAST_PARAMS).await {
            Ok(text) => Ok(Summary {
                summary: text,
                kind: "fast".to_string(),
                note,
            }),
            Err(e) => {
                // Any AI failure degrades fast mode, not just quota.
                warn!("Fast summarization failed ({e}), degrading to extractive");
                extractive_summary(cleaned)
            }
        }
    }

    async fn complete(&self, transcript_text: &str) -> Result<Summary, SummarizeError> {
        let cleaned = transcript_text.trim();
        if cleaned.is_empty() {
            return Err(SummarizeError::EmptyTranscript);
        }

        let total_words = word_count(cleaned);
        if total_words <= COMPLETE_DELEGATION_WORDS {
            return self.fast(cleaned).await;
        }

        let Some(generator) = &self.generator else {
            return extractive_summary(cleaned);
        };

        let windows = word_windows(cleaned, DEFAULT_WINDOW_WORDS);
        let mut window_summaries = Vec::with_capacity(windows.len());

        for (i, window) in windows.iter().enumerate() {
            let prompt = format!("Summarize this part of a video in 5-7 bullet points:\n{window}");
            match generator.generate(&prompt, &WINDOW_PARAMS).await {
                Ok(text) => window_summaries.push(text),
                Err(AiError::QuotaExceeded) => {
                    // Quota is gone; partial window work is discarded and the
                    // original transcript gets the extractive treatment.
                    warn!("Quota exceeded on window {}, degrading to extractive", i + 1);
                    return extractive_summary(cleaned);
                }
                Err(AiError::Other(msg)) => {
                    debug!("Window {} failed: {msg}", i + 1);
                    window_summaries.push(format!("Error processing section {}", i + 1));
                }
            }
        }

        let combined = window_summaries.join("\n\n");
        let prompt =
            format!("Create a comprehensive summary in 15-20 bullet points from these video sections:\n{combined}");
        match generator.generate(&prompt, &SYNTHESIS_PARAMS).await {
            Ok(text) => Ok(Summary {
                summary: text,
                kind: "complete".to_string(),
                note: Some(format!(
                    "Complete summary covering all {total_words} words from {} sections",
                    windows.len()
                )),
            }),
            Err(AiError::QuotaExceeded) => {
                // The per-window work already succeeded; keep it.
                warn!("Quota exceeded on final synthesis, returning partial result");
                Ok(Summary {
                    summary: combined,
                    kind: "partial_complete".to_string(),
                    note: Some("⚠️ AI quota exceeded during final summary. Showing chunk summaries.".to_string()),
                })
            }
            Err(AiError::Other(msg)) => Err(SummarizeError::FinalSynthesis(msg)),
        }
    }
}

/// Non-AI extractive summary: first sentences as bullets, supplemented with
/// fixed word chunks when too few sentences qualify. Never fails on
/// non-empty input.
pub fn extractive_summary(transcript_text: &str) -> Result<Summary, SummarizeError> {
    let cleaned = transcript_text.trim();
    if cleaned.is_empty() {
        return Err(SummarizeError::EmptyTranscript);
    }

    let mut bullets: Vec<String> = cleaned
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_SENTENCE_CANDIDATES)
        .filter(|s| s.chars().count() > 10)
        .map(|s| format!("• {s}"))
        .collect();

    if bullets.len() < MIN_SENTENCE_BULLETS {
        let words: Vec<&str> = cleaned.split_whitespace().collect();
        let limit = words.len().min(SUPPLEMENT_WORD_LIMIT);
        for chunk in words[..limit].chunks(SUPPLEMENT_CHUNK_WORDS) {
            bullets.push(format!("• {}", chunk.join(" ")));
        }
    }

    bullets.truncate(MAX_BULLETS);

    Ok(Summary {
        summary: bullets.join("\n"),
        kind: "basic".to_string(),
        note: Some("📝 Basic text summary (no AI processing)".to_string()),
    })
}
