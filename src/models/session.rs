use serde::Serialize;

use super::interview::{InterviewConfig, QaRecord, MAX_QUESTIONS};

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub config: InterviewConfig,
    pub history: Vec<QaRecord>,
    /// Empty once the session is terminal.
    pub current_question: String,
    pub step: u32,
}

impl SessionState {
    pub fn new(config: InterviewConfig, first_question: String) -> Self {
        Self {
            config,
            history: Vec::new(),
            current_question: first_question,
            step: 1,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.step > MAX_QUESTIONS
    }

    pub fn asked_questions(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(|qa| qa.question.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Configuring,
    Asking,
    Completed,
}
