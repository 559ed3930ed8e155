use thiserror::Error;

/// Classified failures from the transcript acquisition chain.
///
/// Classification happens at the point the external call fails; the
/// pipeline and handlers branch on the variant, never on message text.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("could not extract a video ID from the given URL")]
    InvalidVideoId,

    #[error("No captions or transcripts available for this video.")]
    NoTranscriptAvailable,

    #[error(
        "YouTube is temporarily blocking transcript access due to too many requests \
         from this server. Please try again in a few hours, supply session cookies, \
         or use a different video. This is a YouTube limitation, not a bug in the app."
    )]
    UpstreamBlocked,

    #[error("transcript source error: {0}")]
    Upstream(String),
}

impl TranscriptError {
    pub fn is_blocked(&self) -> bool {
        matches!(self, TranscriptError::UpstreamBlocked)
    }
}

/// Signals in a response body that mean the captioning source is
/// rate-limiting or bot-challenging this process rather than lacking
/// captions for the video.
pub fn body_signals_block(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("too many requests")
        || lower.contains("google.com/sorry")
        || lower.contains("unusual traffic")
        || lower.contains("confirm you're not a robot")
        || lower.contains("confirm you’re not a robot")
}

/// Classify a non-success response from the captioning source.
pub fn classify_upstream(status: reqwest::StatusCode, body: &str) -> TranscriptError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || body_signals_block(body) {
        TranscriptError::UpstreamBlocked
    } else {
        TranscriptError::Upstream(format!("captioning source returned {status}"))
    }
}

/// Classified failures from the generative-text service.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("generative API quota exceeded")]
    QuotaExceeded,

    #[error("generative API error: {0}")]
    Other(String),
}

/// Hard failures from the summarization orchestrator. Degradable failures
/// never reach this type; they are absorbed by the extractive or partial
/// fallbacks.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("No content found in captions")]
    EmptyTranscript,

    #[error("Failed to create final summary: {0}")]
    FinalSynthesis(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_429_as_blocked() {
        let err = classify_upstream(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.is_blocked());
    }

    #[test]
    fn test_classify_block_message() {
        let err = classify_upstream(
            reqwest::StatusCode::FORBIDDEN,
            "Error 403: Too Many Requests, see google.com/sorry",
        );
        assert!(err.is_blocked());
    }

    #[test]
    fn test_classify_other_status() {
        let err = classify_upstream(reqwest::StatusCode::NOT_FOUND, "not found");
        assert!(!err.is_blocked());
    }

    #[test]
    fn test_bot_challenge_signals() {
        assert!(body_signals_block("Our systems have detected unusual traffic"));
        assert!(body_signals_block("please confirm you're not a robot"));
        assert!(!body_signals_block("<html>regular watch page</html>"));
    }
}
