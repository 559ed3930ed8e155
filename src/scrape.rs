//! Scrape fallback for when the primary captioning source is blocked.
//!
//! Runs yt-dlp to dump the video's caption manifest, optionally
//! authenticated with session-cookie material supplied by configuration.
//! The selected track's payload URL is downloaded directly and parsed as
//! json3 or WebVTT.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{TranscriptError, body_signals_block, classify_upstream};
use crate::pipeline::TranscriptStrategy;
use crate::subtitle::parse_payload;
use crate::youtube::USER_AGENT;
use crate::{Transcript, TranscriptSource};

/// Subtitle formats we can parse, in preference order.
const PREFERRED_EXTS: [&str; 2] = ["json3", "vtt"];

pub struct YtDlpScrape {
    client: reqwest::Client,
    lang: String,
    cookies: Option<String>,
}

impl YtDlpScrape {
    pub fn new(client: reqwest::Client, lang: impl Into<String>, cookies: Option<String>) -> Self {
        YtDlpScrape {
            client,
            lang: lang.into(),
            cookies,
        }
    }

    /// Write cookie material to a scoped temp file. The file is deleted on
    /// drop, success or failure, so credentials never outlive the attempt.
    fn stage_cookies(&self) -> Result<Option<NamedTempFile>, TranscriptError> {
        let Some(material) = &self.cookies else {
            return Ok(None);
        };
        let mut file = NamedTempFile::new()
            .map_err(|e| TranscriptError::Upstream(format!("could not stage cookie file: {e}")))?;
        std::io::Write::write_all(&mut file, material.as_bytes())
            .map_err(|e| TranscriptError::Upstream(format!("could not stage cookie file: {e}")))?;
        Ok(Some(file))
    }

    async fn dump_manifest(&self, video_id: &str) -> Result<Value, TranscriptError> {
        let cookie_file = self.stage_cookies()?;

        let url = format!("https://www.youtube.com/watch?v={video_id}");
        let mut cmd = tokio::process::Command::new("yt-dlp");
        cmd.args(["-J", "--skip-download", "--no-playlist"]);
        if let Some(ref file) = cookie_file {
            debug!("Using session cookies for scrape attempt");
            cmd.arg("--cookies").arg(file.path());
        }
        cmd.arg(&url);

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TranscriptError::Upstream("yt-dlp not found (required for the scrape fallback)".to_string())
            } else {
                TranscriptError::Upstream(format!("failed to run yt-dlp: {e}"))
            }
        })?;

        // cookie_file dropped at end of scope on every path; the staged
        // credentials are removed unconditionally.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("429") || stderr.contains("Sign in to confirm") || body_signals_block(&stderr) {
                return Err(TranscriptError::UpstreamBlocked);
            }
            let last_line = stderr.lines().last().unwrap_or("unknown error");
            return Err(TranscriptError::Upstream(format!("yt-dlp failed: {last_line}")));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| TranscriptError::Upstream(format!("invalid yt-dlp manifest: {e}")))
    }

    async fn download_payload(&self, url: &str) -> Result<String, TranscriptError> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| TranscriptError::Upstream(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TranscriptError::Upstream(e.to_string()))?;
        if !status.is_success() {
            return Err(classify_upstream(status, &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl TranscriptStrategy for YtDlpScrape {
    fn name(&self) -> &'static str {
        "yt-dlp-scrape"
    }

    async fn attempt(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
        let manifest = self.dump_manifest(video_id).await?;

        let (payload_url, language) = select_caption_url(&manifest, &self.lang)
            .ok_or(TranscriptError::NoTranscriptAvailable)?;
        debug!("Scrape selected caption track lang={language}");

        let payload = self.download_payload(&payload_url).await?;
        let lines = parse_payload(&payload)?;
        if lines.is_empty() {
            return Err(TranscriptError::NoTranscriptAvailable);
        }

        Ok(Transcript {
            video_id: video_id.to_string(),
            language,
            source: TranscriptSource::Scrape,
            lines,
        })
    }
}

/// Pick a caption track URL from a yt-dlp manifest. Manual subtitles take
/// priority over automatic captions; within each, the preferred language,
/// then a regional variant of it, then any track at all.
pub fn select_caption_url(manifest: &Value, lang: &str) -> Option<(String, String)> {
    for section in ["subtitles", "automatic_captions"] {
        let Some(tracks) = manifest.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        if tracks.is_empty() {
            continue;
        }

        let key = if tracks.contains_key(lang) {
            Some(lang.to_string())
        } else {
            tracks
                .keys()
                .find(|k| k.starts_with(&format!("{lang}-")))
                .or_else(|| tracks.keys().next())
                .cloned()
        };

        if let Some(key) = key {
            if let Some(url) = pick_format(&tracks[&key]) {
                return Some((url, key));
            }
        }
    }
    None
}

/// Choose the best-supported format entry for a track.
fn pick_format(entries: &Value) -> Option<String> {
    let entries = entries.as_array()?;
    for ext in PREFERRED_EXTS {
        if let Some(entry) = entries.iter().find(|e| e.get("ext").and_then(|v| v.as_str()) == Some(ext)) {
            return entry.get("url").and_then(|v| v.as_str()).map(str::to_string);
        }
    }
    entries
        .first()
        .and_then(|e| e.get("url"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
