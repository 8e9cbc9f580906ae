//! API request and response types

use crate::calculator::CalcState;
use crate::display::DisplayView;
use serde::{Deserialize, Serialize};

/// Request to ask the oracle a question
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

/// Raw state plus its rendered view
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: CalcState,
    pub display: DisplayView,
}

impl StateResponse {
    pub fn new(state: CalcState) -> Self {
        let display = DisplayView::from_state(&state);
        Self { state, display }
    }
}

/// Response for event dispatch
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Server version and oracle model
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub model: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
