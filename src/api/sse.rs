//! Server-Sent Events support

use crate::calculator::CalcState;
use crate::display::DisplayView;
use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream, starting with the current state
pub fn sse_stream(
    init_state: CalcState,
    broadcast_rx: tokio::sync::broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&init_state)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn init_event(state: &CalcState) -> Event {
    let data = json!({
        "type": "init",
        "state": state,
        "display": DisplayView::from_state(state),
    });
    Event::default().event("init").data(data.to_string())
}

fn sse_event_to_axum(event: SseEvent) -> Event {
    let (event_type, data) = match event {
        SseEvent::State { state, cause } => (
            "state",
            json!({
                "type": "state",
                "cause": cause,
                "display": DisplayView::from_state(&state),
                "state": state,
            }),
        ),
        SseEvent::QueryStarted { query } => (
            "query_started",
            json!({
                "type": "query_started",
                "query": query
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
