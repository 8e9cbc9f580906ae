//! Events that drive the calculator

use super::state::Operator;
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Arithmetic
    AppendSymbol {
        symbol: char,
    },
    SelectOperator {
        operator: Operator,
    },
    Clear,
    DeleteLastSymbol,
    Evaluate,

    // Query overlay
    ToggleQueryMode,
    SetQueryText {
        text: String,
    },
    BeginQuery,
    SubmitQuery {
        text: String,
    },
    /// Oracle round trip finished. Only the runtime produces this.
    CompleteQuery {
        answer: String,
        #[serde(default)]
        note: Option<String>,
    },
    ClearHistory,
}

impl Event {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::AppendSymbol { .. } => "append_symbol",
            Event::SelectOperator { .. } => "select_operator",
            Event::Clear => "clear",
            Event::DeleteLastSymbol => "delete_last_symbol",
            Event::Evaluate => "evaluate",
            Event::ToggleQueryMode => "toggle_query_mode",
            Event::SetQueryText { .. } => "set_query_text",
            Event::BeginQuery => "begin_query",
            Event::SubmitQuery { .. } => "submit_query",
            Event::CompleteQuery { .. } => "complete_query",
            Event::ClearHistory => "clear_history",
        }
    }

    /// Whether a client may send this event directly. `BeginQuery` only
    /// happens as part of `SubmitQuery`; sent alone it would leave the
    /// oracle marked busy with nothing in flight.
    pub fn is_user_event(&self) -> bool {
        !matches!(self, Event::BeginQuery | Event::CompleteQuery { .. })
    }
}
