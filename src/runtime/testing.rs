//! Mock implementations for testing
//!
//! These mocks enable runtime and oracle tests without network I/O.

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::oracle::{Answer, AnswerProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Mock LLM service that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    delay: Option<Duration>,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful response with the given text
    pub fn queue_text(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(LlmResponse {
            text: text.into(),
            finish_reason: Some("STOP".to_string()),
            ..LlmResponse::default()
        }));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock Answer Providers
// ============================================================================

/// Answer provider returning queued answers, then `Answer::fizzle()`
#[derive(Default)]
pub struct MockAnswerProvider {
    answers: Mutex<VecDeque<Answer>>,
    /// Record of all queries asked
    pub queries: Mutex<Vec<String>>,
}

impl MockAnswerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_answer(&self, answer: Answer) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerProvider for MockAnswerProvider {
    async fn answer(&self, query: &str) -> Answer {
        self.queries.lock().unwrap().push(query.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Answer::fizzle)
    }
}

/// Answer provider that holds every answer until released
pub struct GatedAnswerProvider {
    inner: MockAnswerProvider,
    gate: Notify,
    /// Notified when a query starts (for test synchronization)
    pub query_started: Arc<Notify>,
}

impl GatedAnswerProvider {
    pub fn new() -> Self {
        Self {
            inner: MockAnswerProvider::new(),
            gate: Notify::new(),
            query_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_answer(&self, answer: Answer) {
        self.inner.queue_answer(answer);
    }

    /// Let one waiting (or the next) query complete
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.inner.recorded_queries()
    }
}

impl Default for GatedAnswerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerProvider for GatedAnswerProvider {
    async fn answer(&self, query: &str) -> Answer {
        self.query_started.notify_one();
        self.gate.notified().await;
        self.inner.answer(query).await
    }
}

// ============================================================================
// Runtime tests
// ============================================================================

mod tests {
    use super::*;
    use crate::calculator::state::Operator;
    use crate::calculator::{Event, HistoryKind};
    use crate::runtime::{spawn, SseEvent};

    fn digit(symbol: char) -> Event {
        Event::AppendSymbol { symbol }
    }

    #[tokio::test]
    async fn test_mock_llm_service() {
        let mock = MockLlmService::new("test-model");
        mock.queue_text("Hello");

        let request = LlmRequest::user_prompt("hi");
        let response = mock.complete(&request).await.unwrap();
        assert_eq!(response.text, "Hello");

        // Second call should fail (no more responses)
        assert!(mock.complete(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_arithmetic_through_runtime() {
        let handle = spawn(Arc::new(MockAnswerProvider::new()));
        for event in [
            digit('3'),
            Event::SelectOperator {
                operator: Operator::Add,
            },
            digit('4'),
            Event::SelectOperator {
                operator: Operator::Add,
            },
            digit('5'),
            Event::Evaluate,
        ] {
            handle.send_event(event).await.unwrap();
        }

        let state = handle.wait_for(|s| !s.history.is_empty()).await.unwrap();
        assert_eq!(state.current_operand, "12");
        assert_eq!(state.history[0].expression, "7 + 5");
        assert_eq!(state.history[0].kind, HistoryKind::Standard);
        assert!(state.history[0].timestamp > 0);
    }

    #[tokio::test]
    async fn test_query_round_trip() {
        let oracle = Arc::new(MockAnswerProvider::new());
        oracle.queue_answer(Answer::new("904.78", Some("A trifle.".to_string())));
        let handle = spawn(oracle.clone());

        handle.send_event(Event::ToggleQueryMode).await.unwrap();
        handle
            .send_event(Event::SubmitQuery {
                text: "volume of a sphere radius 6".to_string(),
            })
            .await
            .unwrap();

        let state = handle.wait_for(|s| !s.history.is_empty()).await.unwrap();
        assert_eq!(state.current_operand, "904.78");
        assert_eq!(state.query_note.as_deref(), Some("A trifle."));
        assert!(state.overwrite);
        assert!(!state.is_pending);
        assert!(!state.query_mode);
        assert_eq!(state.history[0].kind, HistoryKind::External);
        assert_eq!(state.history[0].expression, "volume of a sphere radius 6");
        assert_eq!(oracle.recorded_queries(), vec!["volume of a sphere radius 6"]);
    }

    #[tokio::test]
    async fn test_failure_placeholder_still_recorded() {
        let handle = spawn(Arc::new(MockAnswerProvider::new()));
        handle
            .send_event(Event::SubmitQuery {
                text: "divide by dragon".to_string(),
            })
            .await
            .unwrap();

        let state = handle.wait_for(|s| !s.history.is_empty()).await.unwrap();
        assert_eq!(state.current_operand, crate::oracle::FIZZLE_ANSWER);
        assert_eq!(state.history.len(), 1);
        assert!(state.overwrite);
    }

    #[tokio::test]
    async fn test_blank_query_is_not_dispatched() {
        let oracle = Arc::new(MockAnswerProvider::new());
        let handle = spawn(oracle.clone());
        handle
            .send_event(Event::SubmitQuery {
                text: "   ".to_string(),
            })
            .await
            .unwrap();
        handle.send_event(digit('8')).await.unwrap();

        let state = handle.wait_for(|s| s.current_operand == "8").await.unwrap();
        assert!(!state.is_pending);
        assert!(oracle.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_resubmission_while_pending_is_ignored() {
        let oracle = Arc::new(GatedAnswerProvider::new());
        oracle.queue_answer(Answer::new("1", None));
        let handle = spawn(oracle.clone());

        handle
            .send_event(Event::SubmitQuery {
                text: "first".to_string(),
            })
            .await
            .unwrap();
        oracle.query_started.notified().await;

        handle
            .send_event(Event::SubmitQuery {
                text: "second".to_string(),
            })
            .await
            .unwrap();
        handle.send_event(digit('2')).await.unwrap();
        let pending = handle.wait_for(|s| s.current_operand == "2").await.unwrap();
        assert!(pending.is_pending);
        assert_eq!(pending.query_text, "first");

        oracle.release();
        let done = handle.wait_for(|s| !s.is_pending).await.unwrap();
        assert_eq!(done.history.len(), 1);
        assert_eq!(done.history[0].expression, "first");
        assert_eq!(oracle.recorded_queries(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_completion_after_leaving_query_mode_applies() {
        let oracle = Arc::new(GatedAnswerProvider::new());
        oracle.queue_answer(Answer::new("42", None));
        let handle = spawn(oracle.clone());

        handle.send_event(Event::ToggleQueryMode).await.unwrap();
        handle
            .send_event(Event::SubmitQuery {
                text: "meaning of life".to_string(),
            })
            .await
            .unwrap();
        oracle.query_started.notified().await;

        // User cancels the overlay and keeps typing
        handle.send_event(Event::ToggleQueryMode).await.unwrap();
        handle.send_event(digit('9')).await.unwrap();
        handle.wait_for(|s| s.current_operand == "9").await.unwrap();

        oracle.release();
        let state = handle.wait_for(|s| !s.is_pending).await.unwrap();
        assert_eq!(state.current_operand, "42");
        assert!(state.overwrite);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].kind, HistoryKind::External);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let handle = spawn(Arc::new(MockAnswerProvider::new()));
        let mut rx = handle.subscribe();

        handle.send_event(digit('6')).await.unwrap();
        match rx.recv().await.unwrap() {
            SseEvent::State { state, cause } => {
                assert_eq!(cause, "append_symbol");
                assert_eq!(state.current_operand, "6");
            }
            SseEvent::QueryStarted { .. } => panic!("unexpected query"),
        }
        assert_eq!(handle.snapshot().current_operand, "6");
    }

    #[tokio::test]
    async fn test_query_started_is_broadcast() {
        let oracle = Arc::new(GatedAnswerProvider::new());
        let handle = spawn(oracle.clone());
        let mut rx = handle.subscribe();

        handle
            .send_event(Event::SubmitQuery {
                text: "how hot is dragon fire".to_string(),
            })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            SseEvent::QueryStarted { query } => assert_eq!(query, "how hot is dragon fire"),
            SseEvent::State { .. } => panic!("expected query notification first"),
        }
        oracle.release();
    }
}
