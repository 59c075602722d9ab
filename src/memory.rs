use serde::{Deserialize, Serialize};

/// One completed question/answer exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

/// Ordered history of question/answer turns for one document session
///
/// This is an explicit per-session value, owned by the session that created
/// it rather than a process-wide store, so independent sessions cannot see or
/// corrupt each other's history. Turns are appended only after a QA call
/// fully succeeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// All turns in call order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Forget the whole history
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
