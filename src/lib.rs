pub mod chunk;
pub mod config;
pub mod error;
pub mod gemini;
pub mod pipeline;
pub mod ratelimit;
pub mod scrape;
pub mod server;
pub mod subtitle;
pub mod summarize;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;

/// A single captioned line
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub text: String,
    pub start: Option<f64>,
    pub duration: Option<f64>,
}

impl TranscriptLine {
    pub fn bare(text: impl Into<String>) -> Self {
        TranscriptLine {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// Which acquisition strategy produced the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    Captions,
    Listing,
    Scrape,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Captions => write!(f, "captions"),
            TranscriptSource::Listing => write!(f, "listing"),
            TranscriptSource::Scrape => write!(f, "scrape"),
        }
    }
}

/// Complete transcript for a video, owned by the request that fetched it
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub source: TranscriptSource,
    pub lines: Vec<TranscriptLine>,
}

impl Transcript {
    /// Concatenate line texts with single spaces
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

static ID_AFTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());
static ID_SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([0-9A-Za-z_-]{11})").unwrap());
static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").unwrap());

/// Extract an 11-character video ID from a YouTube URL or bare ID.
///
/// Returns an empty string when nothing matches; the empty ID is passed
/// downstream on purpose and fails at the acquisition stage with a
/// descriptive error.
pub fn extract_video_id(input: &str) -> String {
    if let Some(caps) = ID_AFTER_MARKER.captures(input) {
        return caps[1].to_string();
    }
    if let Some(caps) = ID_SHORT_LINK.captures(input) {
        return caps[1].to_string();
    }
    if input.len() == 11 && BARE_ID.is_match(input) {
        return input.to_string();
    }
    String::new()
}
