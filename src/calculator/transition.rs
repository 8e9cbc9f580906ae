//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result. Malformed requests (evaluating with nothing pending, a second
//! decimal point, a blank query) return the state unchanged.

use super::number::evaluate;
use super::state::{EMPTY_OPERAND, HistoryEntry, Operator};
use super::{CalcContext, CalcState, Effect, Event};

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CalcState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CalcState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function
pub fn transition(state: &CalcState, context: &CalcContext, event: Event) -> TransitionResult {
    match event {
        // ============================================================
        // Arithmetic
        // ============================================================
        Event::AppendSymbol { symbol } => TransitionResult::new(append_symbol(state, symbol)),
        Event::SelectOperator { operator } => {
            TransitionResult::new(select_operator(state, operator))
        }
        Event::Clear => TransitionResult::new(clear(state)),
        Event::DeleteLastSymbol => TransitionResult::new(delete_last_symbol(state)),
        Event::Evaluate => TransitionResult::new(evaluate_pending(state, context)),

        // ============================================================
        // Query overlay
        // ============================================================
        Event::ToggleQueryMode => {
            let mut next = state.clone();
            next.query_mode = !state.query_mode;
            next.query_note = None;
            next.query_text.clear();
            TransitionResult::new(next)
        }
        Event::SetQueryText { text } => {
            let mut next = state.clone();
            next.query_text = text;
            TransitionResult::new(next)
        }
        Event::BeginQuery => TransitionResult::new(begin_query(state)),
        Event::SubmitQuery { text } => submit_query(state, text),
        Event::CompleteQuery { answer, note } => {
            TransitionResult::new(complete_query(state, context, answer, note))
        }
        Event::ClearHistory => {
            let mut next = state.clone();
            next.history.clear();
            TransitionResult::new(next)
        }
    }
}

fn is_operand_symbol(symbol: char) -> bool {
    symbol.is_ascii_digit() || symbol == '.'
}

fn append_symbol(state: &CalcState, symbol: char) -> CalcState {
    if !is_operand_symbol(symbol) {
        return state.clone();
    }

    let mut next = state.clone();
    if state.overwrite {
        next.current_operand = symbol.to_string();
        next.overwrite = false;
        return next;
    }

    if symbol == '0' && state.current_operand == EMPTY_OPERAND {
        return next;
    }
    if symbol == '.' && state.current_operand.contains('.') {
        return next;
    }

    if state.current_operand == EMPTY_OPERAND && symbol != '.' {
        next.current_operand = symbol.to_string();
    } else {
        next.current_operand.push(symbol);
    }
    next
}

fn select_operator(state: &CalcState, operator: Operator) -> CalcState {
    let mut next = state.clone();
    next.previous_operand = match (&state.previous_operand, state.operation) {
        // Chained: collapse the pending computation first, left to right
        (Some(previous), Some(pending)) => {
            Some(evaluate(previous, pending, &state.current_operand))
        }
        _ => Some(state.current_operand.clone()),
    };
    next.operation = Some(operator);
    next.current_operand = EMPTY_OPERAND.to_string();
    next
}

fn clear(state: &CalcState) -> CalcState {
    let mut next = state.clone();
    next.current_operand = EMPTY_OPERAND.to_string();
    next.previous_operand = None;
    next.operation = None;
    next.query_mode = false;
    next.query_note = None;
    next
}

fn delete_last_symbol(state: &CalcState) -> CalcState {
    let mut next = state.clone();
    if state.overwrite {
        next.overwrite = false;
        next.current_operand = EMPTY_OPERAND.to_string();
        return next;
    }

    next.current_operand.pop();
    if next.current_operand.is_empty() {
        next.current_operand = EMPTY_OPERAND.to_string();
    }
    next
}

fn evaluate_pending(state: &CalcState, context: &CalcContext) -> CalcState {
    let (Some(previous), Some(operator)) = (&state.previous_operand, state.operation) else {
        return state.clone();
    };

    let result = evaluate(previous, operator, &state.current_operand);
    let expression = format!("{previous} {operator} {}", state.current_operand);

    let mut next = state.clone();
    next.history
        .push(HistoryEntry::standard(expression, result.clone(), context.now_millis));
    next.current_operand = result;
    next.previous_operand = None;
    next.operation = None;
    next.overwrite = true;
    next
}

fn begin_query(state: &CalcState) -> CalcState {
    let mut next = state.clone();
    next.is_pending = true;
    next.query_note = None;
    next
}

fn submit_query(state: &CalcState, text: String) -> TransitionResult {
    if text.trim().is_empty() || state.is_pending {
        return TransitionResult::new(state.clone());
    }

    let mut next = begin_query(state);
    next.query_text.clone_from(&text);
    TransitionResult::new(next).with_effect(Effect::request_answer(text))
}

/// Applied unconditionally, even if the overlay was closed meanwhile.
fn complete_query(
    state: &CalcState,
    context: &CalcContext,
    answer: String,
    note: Option<String>,
) -> CalcState {
    let mut next = state.clone();
    next.history.push(HistoryEntry::external(
        state.query_text.clone(),
        answer.clone(),
        context.now_millis,
    ));
    next.is_pending = false;
    next.query_note = note.filter(|n| !n.is_empty());
    next.current_operand = answer;
    next.query_mode = false;
    next.overwrite = true;
    next
}
