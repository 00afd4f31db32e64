use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::interview::{InterviewConfig, InterviewMode, QaRecord, SummaryReport};
use crate::models::session::{SessionState, SessionStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartInterviewRequest {
    #[validate(length(min = 1, max = 120, message = "Role must be 1-120 characters"))]
    pub role: String,
    #[serde(default)]
    #[validate(length(max = 120, message = "Domain must be at most 120 characters"))]
    pub domain: Option<String>,
    #[validate(length(min = 1, max = 60, message = "Mode must be 1-60 characters"))]
    pub mode: String,
}

impl StartInterviewRequest {
    pub fn into_config(self) -> InterviewConfig {
        InterviewConfig::new(self.role, self.domain, InterviewMode::from(self.mode))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 5000, message = "Answer must be 1-5000 characters"))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartInterviewResponse {
    pub session_token: String,
    pub status: SessionStatus,
    pub step: u32,
    pub max_steps: u32,
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub record: QaRecord,
    pub step: u32,
    pub max_steps: u32,
    pub completed: bool,
    pub next_question: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub config: Option<InterviewConfig>,
    pub step: Option<u32>,
    pub max_steps: u32,
    pub current_question: Option<String>,
    pub history: Vec<QaRecord>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SessionSnapshot {
    pub fn new(
        status: SessionStatus,
        state: Option<&SessionState>,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            status,
            config: state.map(|s| s.config.clone()),
            step: state.map(|s| s.step),
            max_steps: crate::models::interview::MAX_QUESTIONS,
            current_question: state
                .map(|s| s.current_question.clone())
                .filter(|q| !q.is_empty()),
            history: state.map(|s| s.history.clone()).unwrap_or_default(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub history: Vec<QaRecord>,
    pub summary: SummaryReport,
}
