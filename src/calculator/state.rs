//! Calculator state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of `current_operand` when nothing has been entered
pub const EMPTY_OPERAND: &str = "0";

// ============================================================================
// Operators
// ============================================================================

/// One of the four binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Apply with plain IEEE semantics (x / 0 is infinite or NaN)
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// History
// ============================================================================

/// Where a history entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// An arithmetic evaluation
    Standard,
    /// An answer from the external oracle
    External,
}

/// A completed evaluation or query resolution. Never modified once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub kind: HistoryKind,
}

impl HistoryEntry {
    pub fn standard(expression: impl Into<String>, result: impl Into<String>, timestamp: i64) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp,
            kind: HistoryKind::Standard,
        }
    }

    pub fn external(expression: impl Into<String>, result: impl Into<String>, timestamp: i64) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp,
            kind: HistoryKind::External,
        }
    }
}

// ============================================================================
// Calculator State
// ============================================================================

/// Full calculator state. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcState {
    /// Operand being entered; `"0"` when empty
    pub current_operand: String,
    /// Operand captured when the pending operator was chosen
    pub previous_operand: Option<String>,
    pub operation: Option<Operator>,
    /// Next symbol replaces `current_operand` instead of extending it
    pub overwrite: bool,
    /// Chronological, append-only
    pub history: Vec<HistoryEntry>,

    // Query overlay
    pub query_mode: bool,
    pub query_text: String,
    pub query_note: Option<String>,
    pub is_pending: bool,
}

impl Default for CalcState {
    fn default() -> Self {
        Self {
            current_operand: EMPTY_OPERAND.to_string(),
            previous_operand: None,
            operation: None,
            overwrite: false,
            history: Vec::new(),
            query_mode: false,
            query_text: String::new(),
            query_note: None,
            is_pending: false,
        }
    }
}

/// Inputs to a transition that come from outside the state
#[derive(Debug, Clone, Copy)]
pub struct CalcContext {
    /// Wall clock used to stamp history entries (epoch millis)
    pub now_millis: i64,
}

impl CalcContext {
    pub fn at(now_millis: i64) -> Self {
        Self { now_millis }
    }

    pub fn now() -> Self {
        Self::at(chrono::Utc::now().timestamp_millis())
    }
}
