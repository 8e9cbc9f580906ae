//! The dragon oracle: answers free-text questions through an LLM
//!
//! Never fails. Missing credentials and every transport or parse failure are
//! folded into a placeholder answer with an explanatory note, so the
//! calculator only ever sees a well-formed `Answer`.

use crate::llm::{LlmError, LlmRequest, LlmService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

pub const MISSING_KEY_ANSWER: &str = "Error";
pub const MISSING_KEY_NOTE: &str = "The Dragon sleeps... (API Key missing)";
pub const FIZZLE_ANSWER: &str = "Fizzle...";
pub const FIZZLE_NOTE: &str =
    "The magical energies are unstable. I cannot compute that right now.";

const MAX_ANSWER_TOKENS: u32 = 512;

/// Result of a query, always well-formed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub note: Option<String>,
}

impl Answer {
    pub fn new(answer: impl Into<String>, note: Option<String>) -> Self {
        Self {
            answer: answer.into(),
            note,
        }
    }

    pub fn missing_key() -> Self {
        Self::new(MISSING_KEY_ANSWER, Some(MISSING_KEY_NOTE.to_string()))
    }

    pub fn fizzle() -> Self {
        Self::new(FIZZLE_ANSWER, Some(FIZZLE_NOTE.to_string()))
    }
}

/// Anything that can answer a free-text question
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, query: &str) -> Answer;
}

#[async_trait]
impl<T: AnswerProvider + ?Sized> AnswerProvider for Arc<T> {
    async fn answer(&self, query: &str) -> Answer {
        (**self).answer(query).await
    }
}

#[derive(Debug, Error)]
enum OracleError {
    #[error("no answer within {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("empty response")]
    EmptyResponse,
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("reply has no usable answer field")]
    MissingAnswer,
}

/// Answer provider backed by a language model playing a red dragon
pub struct DragonOracle {
    llm: Option<Arc<dyn LlmService>>,
    timeout: Duration,
}

impl DragonOracle {
    pub fn new(llm: Option<Arc<dyn LlmService>>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    pub fn model_id(&self) -> Option<&str> {
        self.llm.as_deref().map(LlmService::model_id)
    }

    async fn consult(&self, llm: &dyn LlmService, query: &str) -> Result<Answer, OracleError> {
        let request = LlmRequest::user_prompt(build_prompt(query))
            .with_json_response()
            .with_max_tokens(MAX_ANSWER_TOKENS);

        let response = timeout(self.timeout, llm.complete(&request))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        if response.text.trim().is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        parse_reply(&response.text)
    }
}

#[async_trait]
impl AnswerProvider for DragonOracle {
    async fn answer(&self, query: &str) -> Answer {
        let Some(llm) = self.llm.as_deref() else {
            tracing::warn!("Query received but no LLM is configured");
            return Answer::missing_key();
        };

        match self.consult(llm, query).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, model = %llm.model_id(), "Dragon query failed");
                Answer::fizzle()
            }
        }
    }
}

fn build_prompt(query: &str) -> String {
    format!(
        r#"You are an ancient, wise, and slightly arrogant Red Dragon who loves mathematics.
User Query: "{query}"

Your goal:
1. Solve the math problem or answer the question accurately.
2. Provide a short, thematic "flavor text" commentary as a dragon.

Output ONLY valid JSON in this format:
{{
  "answer": "The numerical or short text answer",
  "flavorText": "A brief, 1-sentence dragon commentary."
}}
Do not include markdown code blocks. Just the raw JSON string."#
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DragonReply {
    answer: Value,
    #[serde(default)]
    flavor_text: Option<String>,
}

/// Parse `{ "answer": ..., "flavorText": ... }`, tolerating a fenced block
fn parse_reply(text: &str) -> Result<Answer, OracleError> {
    let reply: DragonReply = serde_json::from_str(strip_code_fence(text))?;

    let answer = match reply.answer {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return Err(OracleError::MissingAnswer),
    };
    let note = reply.flavor_text.filter(|t| !t.trim().is_empty());

    Ok(Answer::new(answer, note))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening line
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
