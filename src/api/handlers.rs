//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ErrorResponse, QueryRequest, QueuedResponse, StateResponse, VersionResponse};
use super::AppState;
use crate::calculator::Event;
use crate::runtime::RuntimeError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/events", post(dispatch_event))
        .route("/api/query", post(submit_query))
        .route("/api/history", delete(clear_history))
        .route("/api/stream", get(stream_state))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// State
// ============================================================

async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse::new(state.runtime.snapshot()))
}

async fn stream_state(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so no update falls in between
    let broadcast_rx = state.runtime.subscribe();
    sse_stream(state.runtime.snapshot(), broadcast_rx)
}

// ============================================================
// Actions
// ============================================================

async fn dispatch_event(
    State(state): State<AppState>,
    payload: Result<Json<Event>, JsonRejection>,
) -> Result<Json<QueuedResponse>, AppError> {
    let Json(event) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if !event.is_user_event() {
        return Err(AppError::BadRequest(format!(
            "{} cannot be sent by clients",
            event.name()
        )));
    }
    if matches!(event, Event::SubmitQuery { .. }) && state.runtime.snapshot().is_pending {
        return Err(AppError::QueryPending);
    }

    state.runtime.send_event(event).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn submit_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueuedResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if req.text.trim().is_empty() {
        return Ok(Json(QueuedResponse { queued: false }));
    }
    if state.runtime.snapshot().is_pending {
        return Err(AppError::QueryPending);
    }

    state
        .runtime
        .send_event(Event::SubmitQuery { text: req.text })
        .await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn clear_history(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    state.runtime.send_event(Event::ClearHistory).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

// ============================================================
// Version
// ============================================================

async fn get_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        model: state.model_id,
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    QueryPending,
    Unavailable(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        AppError::Unavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::QueryPending => (
                StatusCode::CONFLICT,
                "A query is already in flight".to_string(),
            ),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
