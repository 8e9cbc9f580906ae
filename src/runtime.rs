//! Runtime owning the calculator state
//!
//! A single task receives events, applies the pure transition and executes
//! the resulting effects. Handles are cheap to clone and are the only way
//! to reach the state.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::CalculatorRuntime;

use crate::calculator::{CalcState, Event};
use crate::oracle::AnswerProvider;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const BROADCAST_CAPACITY: usize = 128;

/// Updates sent to stream subscribers
#[derive(Debug, Clone)]
pub enum SseEvent {
    /// State after an event was applied
    State {
        state: Box<CalcState>,
        cause: &'static str,
    },
    /// A query was handed to the oracle
    QueryStarted { query: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("calculator runtime has stopped")]
    Stopped,
}

/// Handle to interact with the running calculator
#[derive(Clone)]
pub struct RuntimeHandle {
    event_tx: mpsc::Sender<Event>,
    state_rx: watch::Receiver<CalcState>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl RuntimeHandle {
    /// Queue an event; it is applied after every previously queued event
    pub async fn send_event(&self, event: Event) -> Result<(), RuntimeError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    /// Current state
    pub fn snapshot(&self) -> CalcState {
        self.state_rx.borrow().clone()
    }

    /// Wait until the state satisfies `predicate`
    #[cfg(test)]
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&CalcState) -> bool,
    ) -> Result<CalcState, RuntimeError> {
        let mut rx = self.state_rx.clone();
        let state = rx
            .wait_for(predicate)
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        Ok(state.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Start a calculator runtime on the current tokio runtime
pub fn spawn<A: AnswerProvider + 'static>(oracle: Arc<A>) -> RuntimeHandle {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (state_tx, state_rx) = watch::channel(CalcState::default());
    let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

    let runtime = CalculatorRuntime::new(
        CalcState::default(),
        oracle,
        event_rx,
        event_tx.downgrade(),
        state_tx,
        broadcast_tx.clone(),
    );
    tokio::spawn(runtime.run());

    RuntimeHandle {
        event_tx,
        state_rx,
        broadcast_tx,
    }
}
