//! Thin HTTP surface over the acquisition and summarization pipelines.
//!
//! Every user-visible failure is a structured `{"error": ...}` payload with
//! HTTP 200 so the frontend renders error text uniformly regardless of
//! cause.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::extract_video_id;
use crate::pipeline::AcquisitionPipeline;
use crate::ratelimit::RateLimiter;
use crate::summarize::{SummaryMode, Summarizer};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AcquisitionPipeline>,
    pub summarizer: Arc<Summarizer>,
    pub limiter: Arc<RateLimiter>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/transcript", post(transcript))
        .route("/summarize", post(summarize))
        .with_state(state)
        .layer(cors)
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Youtubey backend is running!"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "message": "Youtubey backend is running!"}))
}

#[derive(Debug, Deserialize)]
struct TranscriptRequest {
    url: String,
    #[serde(default)]
    summary_type: Option<String>,
}

async fn transcript(State(state): State<AppState>, Json(req): Json<TranscriptRequest>) -> Json<Value> {
    let video_id = extract_video_id(&req.url);
    match state.pipeline.fetch_transcript(&video_id).await {
        Ok(t) => Json(json!({"transcript": t.text()})),
        Err(e) => Json(json!({"error": e.to_string()})),
    }
}

async fn summarize(State(state): State<AppState>, Json(req): Json<TranscriptRequest>) -> Json<Value> {
    if !state.limiter.admit() {
        return Json(json!({
            "error": "Rate limit exceeded. Please wait a moment before trying again."
        }));
    }

    let video_id = extract_video_id(&req.url);
    let mode = SummaryMode::parse(req.summary_type.as_deref().unwrap_or("fast"));

    let transcript = match state.pipeline.fetch_transcript(&video_id).await {
        Ok(t) => t,
        Err(e) => return Json(json!({"error": e.to_string()})),
    };

    match state.summarizer.summarize(mode, &transcript.text()).await {
        Ok(summary) => Json(json!(summary)),
        Err(e) => Json(json!({"error": e.to_string()})),
    }
}
