//! What a front end shows for a given state
//!
//! Operands are grouped en-US style (`1,234,567.89`); anything that is not a
//! plain decimal number (`Infinity`, `NaN`, oracle text) is shown verbatim.

use crate::calculator::{CalcState, HistoryEntry, HistoryKind};
use chrono::{Local, TimeZone};
use serde::Serialize;

pub const QUERY_PROMPT: &str = "The Dragon Awaits Your Query...";
pub const EMPTY_HISTORY: &str = "No chronicles yet recorded...";

/// Rendered view of the calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayView {
    /// Captured operand and pending operator, empty when none
    pub previous_line: String,
    pub current_line: String,
    /// Replaces both lines while the query overlay is open
    pub overlay_prompt: Option<&'static str>,
    /// Oracle commentary, hidden while the overlay is open
    pub note: Option<String>,
    pub submit_label: &'static str,
    /// Newest first
    pub history: Vec<HistoryLine>,
    pub history_placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryLine {
    pub label: &'static str,
    /// Local `HH:MM`
    pub time: String,
    pub expression: String,
    pub result: String,
    pub kind: HistoryKind,
}

impl DisplayView {
    pub fn from_state(state: &CalcState) -> Self {
        let previous_line = match (&state.previous_operand, state.operation) {
            (Some(previous), Some(operator)) => format!("{} {operator}", format_operand(previous)),
            (Some(previous), None) => format_operand(previous),
            _ => String::new(),
        };

        Self {
            previous_line,
            current_line: format_operand(&state.current_operand),
            overlay_prompt: state.query_mode.then_some(QUERY_PROMPT),
            note: state
                .query_note
                .clone()
                .filter(|_| !state.query_mode),
            submit_label: if state.is_pending {
                "CONJURING..."
            } else {
                "SUMMON"
            },
            history: state.history.iter().rev().map(HistoryLine::from_entry).collect(),
            history_placeholder: state.history.is_empty().then_some(EMPTY_HISTORY),
        }
    }
}

impl HistoryLine {
    fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            label: match entry.kind {
                HistoryKind::Standard => "Calculation",
                HistoryKind::External => "Dragon Wisdom",
            },
            time: format_time(entry.timestamp),
            expression: entry.expression.clone(),
            result: entry.result.clone(),
            kind: entry.kind,
        }
    }
}

/// Group the integer part of a decimal operand with commas
pub fn format_operand(operand: &str) -> String {
    if operand.is_empty() {
        return "0".to_string();
    }

    let (integer, fraction) = match operand.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (operand, None),
    };

    let Some(grouped) = group_integer(integer) else {
        return operand.to_string();
    };
    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

fn group_integer(integer: &str) -> Option<String> {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Some(format!("{sign}0"));
    }

    let mut grouped = String::with_capacity(sign.len() + digits.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    Some(grouped)
}

fn format_time(timestamp_millis: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default()
}
