//! Effects produced by state transitions

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the oracle; the runtime feeds the answer back as `Event::CompleteQuery`
    RequestAnswer { query: String },
}

impl Effect {
    pub fn request_answer(query: impl Into<String>) -> Self {
        Effect::RequestAnswer {
            query: query.into(),
        }
    }
}
