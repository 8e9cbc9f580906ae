//! Dragon Calculator - a themed calculator with an LLM oracle
//!
//! Serves the calculator state machine over HTTP. Arithmetic is handled
//! locally; free-text questions are answered by a dragon persona backed by
//! Gemini.

mod api;
mod calculator;
mod display;
mod llm;
mod oracle;
mod runtime;

use api::{create_router, AppState};
use llm::LlmConfig;
use oracle::DragonOracle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dragon_calc=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("DRAGON_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let llm_config = LlmConfig::from_env();
    let llm = llm_config.build_service();

    match &llm {
        Some(service) => tracing::info!(
            model = %service.model_id(),
            gateway = llm_config.gateway.is_some(),
            timeout_secs = llm_config.query_timeout().as_secs(),
            "Dragon oracle initialized"
        ),
        None => tracing::warn!("No Gemini API key configured. Set GEMINI_API_KEY or LLM_GATEWAY."),
    }

    let oracle = DragonOracle::new(llm, llm_config.query_timeout());
    let model_id = oracle.model_id().map(str::to_string);
    let runtime = runtime::spawn(Arc::new(oracle));

    let state = AppState::new(runtime, model_id);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Dragon calculator listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
