//! HTTP API for the calculator

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::RuntimeHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: RuntimeHandle,
    /// Model behind the oracle, if one is configured
    pub model_id: Option<String>,
}

impl AppState {
    pub fn new(runtime: RuntimeHandle, model_id: Option<String>) -> Self {
        Self { runtime, model_id }
    }
}
