//! Environment configuration for the oracle's language model

use super::{GeminiModel, GeminiService, LlmService, LoggingService};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the LLM provider
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    /// exe.dev-style gateway URL (e.g., `http://169.254.169.254/gateway/llm`)
    pub gateway: Option<String>,
    pub model: GeminiModel,
    /// Upper bound on one oracle round trip
    pub query_timeout: Option<Duration>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let model = lookup("DRAGON_MODEL")
            .and_then(|name| match name.parse::<GeminiModel>() {
                Ok(model) => Some(model),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring DRAGON_MODEL");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            gemini_api_key: lookup("GEMINI_API_KEY")
                .filter(|key| !key.is_empty())
                .or_else(|| lookup("API_KEY")),
            gateway: lookup("LLM_GATEWAY"),
            model,
            query_timeout: lookup("DRAGON_QUERY_TIMEOUT_SECS")
                .and_then(|secs| secs.parse().ok())
                .map(Duration::from_secs),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout.unwrap_or(DEFAULT_QUERY_TIMEOUT)
    }

    /// Build the configured service, or `None` when no credentials are available
    pub fn build_service(&self) -> Option<Arc<dyn LlmService>> {
        // In gateway mode the gateway handles authentication
        let api_key = if self.gateway.is_some() {
            "implicit".to_string()
        } else {
            self.gemini_api_key.clone().filter(|key| !key.is_empty())?
        };

        match GeminiService::new(api_key, self.model, self.gateway.as_deref()) {
            Ok(service) => Some(Arc::new(LoggingService::new(Arc::new(service)))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create Gemini service");
                None
            }
        }
    }
}
