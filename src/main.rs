use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use log::{info, warn};

mod cli;

use cli::Cli;
use youtubey::config::Config;
use youtubey::gemini::{GeminiClient, TextGenerator};
use youtubey::pipeline::AcquisitionPipeline;
use youtubey::ratelimit::RateLimiter;
use youtubey::server::{AppState, router};
use youtubey::summarize::Summarizer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(lang) = cli.lang {
        config.preferred_lang = lang;
    }
    if let Some(model) = cli.model {
        config.gemini_model = model;
    }

    let client = reqwest::Client::new();

    let generator: Option<Arc<dyn TextGenerator>> = match config.gemini_api_key.take() {
        Some(key) => {
            info!("Gemini API configured (model {})", config.gemini_model);
            Some(Arc::new(GeminiClient::new(
                client.clone(),
                key,
                config.gemini_model.clone(),
            )))
        }
        None => {
            warn!("GEMINI_API_KEY not set; AI summarization disabled, extractive fallback only");
            None
        }
    };
    if config.cookies.is_some() {
        info!("Session cookies configured for the scrape fallback");
    }

    let state = AppState {
        pipeline: Arc::new(AcquisitionPipeline::new(&config, client)),
        summarizer: Arc::new(Summarizer::new(generator)),
        limiter: Arc::new(RateLimiter::new(config.max_requests_per_minute)),
    };

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on http://0.0.0.0:{}", config.port);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
