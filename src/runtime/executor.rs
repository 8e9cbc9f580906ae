//! Calculator runtime executor

use super::SseEvent;
use crate::calculator::{transition, CalcContext, CalcState, Effect, Event};
use crate::oracle::AnswerProvider;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Event loop around the pure transition function
pub struct CalculatorRuntime<A>
where
    A: AnswerProvider + 'static,
{
    state: CalcState,
    oracle: Arc<A>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle is gone
    event_tx: mpsc::WeakSender<Event>,
    state_tx: watch::Sender<CalcState>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl<A> CalculatorRuntime<A>
where
    A: AnswerProvider + 'static,
{
    pub fn new(
        state: CalcState,
        oracle: Arc<A>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        state_tx: watch::Sender<CalcState>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            state,
            oracle,
            event_rx,
            event_tx,
            state_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting calculator runtime");

        // One event at a time, each to completion
        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!("Calculator runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let cause = event.name();
        tracing::debug!(event = cause, "Processing event");

        let result = transition(&self.state, &CalcContext::now(), event);
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.state_tx.send_replace(self.state.clone());
        // No subscribers is fine
        let _ = self.broadcast_tx.send(SseEvent::State {
            state: Box::new(self.state.clone()),
            cause,
        });
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::RequestAnswer { query } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::warn!("Dropping query, no handles left to deliver the answer");
                    return;
                };

                tracing::info!(query = %query, "Dispatching query to oracle");
                let _ = self.broadcast_tx.send(SseEvent::QueryStarted {
                    query: query.clone(),
                });

                let oracle = Arc::clone(&self.oracle);
                tokio::spawn(async move {
                    let answer = oracle.answer(&query).await;
                    let event = Event::CompleteQuery {
                        answer: answer.answer,
                        note: answer.note,
                    };
                    if event_tx.send(event).await.is_err() {
                        tracing::debug!("Runtime stopped before query completed");
                    }
                });
            }
        }
    }
}
