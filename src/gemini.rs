//! Client for the Gemini generateContent endpoint.
//!
//! Quota and rate-limit failures are classified here, at the point the
//! call fails; the orchestrator only ever inspects `AiError` variants.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::error::AiError;

/// Generation knobs passed per request.
#[derive(Debug, Clone, Copy)]
pub struct GenParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
}

/// Low-randomness, tightly bounded output for the fast path.
pub const FAST_PARAMS: GenParams = GenParams {
    temperature: 0.1,
    max_output_tokens: 200,
    top_p: 0.5,
};

/// Per-window reduce summaries for complete mode.
pub const WINDOW_PARAMS: GenParams = GenParams {
    temperature: 0.2,
    max_output_tokens: 150,
    top_p: 0.7,
};

/// Final synthesis over all window summaries.
pub const SYNTHESIS_PARAMS: GenParams = GenParams {
    temperature: 0.3,
    max_output_tokens: 300,
    top_p: 0.8,
};

/// The seam between the orchestrator and the generative-text service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenParams) -> Result<String, AiError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        GeminiClient { client, api_key, model }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, params: &GenParams) -> Result<String, AiError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_output_tokens,
                "topP": params.top_p
            }
        });

        debug!("Gemini request: model={} prompt_len={}", self.model, prompt.len());

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Other(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| AiError::Other(format!("invalid Gemini response: {e}")))?;
        extract_text(&json)
    }
}

fn classify_failure(status: reqwest::StatusCode, body: &str) -> AiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return AiError::QuotaExceeded;
    }
    let lower = body.to_lowercase();
    if lower.contains("quota") || lower.contains("resource_exhausted") || lower.contains("rate limit") {
        return AiError::QuotaExceeded;
    }
    AiError::Other(format!("Gemini API returned {status}: {body}"))
}

fn extract_text(json: &Value) -> Result<String, AiError> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(AiError::Other("unexpected Gemini API response format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let json = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "parts": [
                            {"text": "• point one\n"},
                            {"text": "• point two"}
                        ]
                    }
                }
            ]
        });
        assert_eq!(extract_text(&json).unwrap(), "• point one\n• point two");
    }

    #[test]
    fn test_extract_text_empty() {
        let json = serde_json::json!({"candidates": []});
        assert!(extract_text(&json).is_err());
    }

    #[test]
    fn test_classify_429() {
        let err = classify_failure(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, AiError::QuotaExceeded));
    }

    #[test]
    fn test_classify_quota_message() {
        let err = classify_failure(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"error": {"status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded"}}"#,
        );
        assert!(matches!(err, AiError::QuotaExceeded));
    }

    #[test]
    fn test_classify_other_failure() {
        let err = classify_failure(reqwest::StatusCode::BAD_REQUEST, "invalid argument");
        assert!(matches!(err, AiError::Other(_)));
    }
}
