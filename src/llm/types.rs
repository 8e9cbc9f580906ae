//! Common types for LLM interactions

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    pub response_format: ResponseFormat,
}

impl LlmRequest {
    /// Single user turn, free-form text reply
    pub fn user_prompt(text: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![LlmMessage::user(text)],
            max_tokens: None,
            response_format: ResponseFormat::Text,
        }
    }

    pub fn with_json_response(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Requested shape of the model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Raw JSON, no markdown wrapping
    Json,
}

/// A user turn; the oracle never replays model turns
#[derive(Debug, Clone)]
pub struct LlmMessage {
    pub text: String,
}

impl LlmMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// LLM response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Concatenated text parts
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
