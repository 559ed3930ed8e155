//! Parsing for the caption payloads served from scrape-stage manifest URLs.
//!
//! Two formats show up: YouTube's json3 event stream (nested text segments
//! with empty/newline-only fragments that must be filtered) and WebVTT cues
//! (timing lines, header/metadata lines, and inline markup to strip). Both
//! reduce to a flat ordered sequence of non-empty text fragments.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::TranscriptLine;
use crate::error::TranscriptError;

#[derive(Debug, Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs")]
    start_ms: Option<u64>,
    #[serde(rename = "dDurationMs")]
    duration_ms: Option<u64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 caption payload into transcript lines. Events without
/// text segments (window metadata) and newline-only fragments are dropped.
pub fn parse_json3(payload: &str) -> Result<Vec<TranscriptLine>, TranscriptError> {
    let parsed: Json3Payload = serde_json::from_str(payload)
        .map_err(|e| TranscriptError::Upstream(format!("invalid json3 caption payload: {e}")))?;

    let mut lines = Vec::new();
    for event in parsed.events {
        let Some(segs) = event.segs else { continue };
        let text = segs
            .iter()
            .map(|s| s.utf8.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }
        lines.push(TranscriptLine {
            text,
            start: event.start_ms.map(|ms| ms as f64 / 1000.0),
            duration: event.duration_ms.map(|ms| ms as f64 / 1000.0),
        });
    }
    Ok(lines)
}

static VTT_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

fn is_vtt_metadata(line: &str) -> bool {
    line.starts_with("WEBVTT")
        || line.starts_with("Kind:")
        || line.starts_with("Language:")
        || line.starts_with("NOTE")
        || line.starts_with("STYLE")
        || line.starts_with("REGION")
}

/// Parse a WebVTT caption payload into transcript lines. Cue timing lines,
/// header/metadata lines, bare cue numbers, and inline markup are stripped.
pub fn parse_vtt(payload: &str) -> Vec<TranscriptLine> {
    let mut lines = Vec::new();
    for raw in payload.lines() {
        let line = raw.trim();
        if line.is_empty() || line.contains("-->") || is_vtt_metadata(line) {
            continue;
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue; // cue identifier
        }
        let stripped = VTT_TAG.replace_all(line, "");
        let text = html_escape::decode_html_entities(stripped.trim()).to_string();
        if text.is_empty() {
            continue;
        }
        lines.push(TranscriptLine::bare(text));
    }
    lines
}

/// Parse a downloaded caption payload, dispatching on shape.
pub fn parse_payload(payload: &str) -> Result<Vec<TranscriptLine>, TranscriptError> {
    if payload.trim_start().starts_with('{') {
        debug!("Parsing caption payload as json3");
        parse_json3(payload)
    } else {
        debug!("Parsing caption payload as WebVTT");
        Ok(parse_vtt(payload))
    }
}
