use crate::error::{Error, Result};
use crate::models::interview::{InterviewConfig, QaRecord, SummaryReport};
use crate::models::session::{SessionState, SessionStatus};
use crate::services::collaborators::Collaborators;
use crate::services::grading_service::GradingService;

/// Result of a submitted answer.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub record: QaRecord,
    pub step: u32,
    /// `None` once the interview is over.
    pub next_question: Option<String>,
}

/// Drives one interview: `Configuring -> Asking(1..=5) -> Completed`.
///
/// The session owns its [`SessionState`]; every transition goes through the
/// four operations below and the history only ever grows by appending.
pub struct InterviewSession {
    collaborators: Collaborators,
    state: Option<SessionState>,
}

impl InterviewSession {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            state: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match &self.state {
            None => SessionStatus::Configuring,
            Some(state) if state.is_terminal() => SessionStatus::Completed,
            Some(_) => SessionStatus::Asking,
        }
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub async fn initialize(&mut self, config: InterviewConfig) -> Result<&SessionState> {
        if self.state.is_some() {
            return Err(Error::invalid_state(
                "An interview is already in progress; restart it before starting a new one",
            ));
        }
        let config = InterviewConfig::new(config.role, config.domain, config.mode);
        config.validate()?;

        let question = self.collaborators.ask(&config, &[]).await;
        tracing::info!(
            role = %config.role,
            domain = %config.domain_label(),
            mode = %config.mode,
            "Interview started"
        );
        Ok(&*self.state.insert(SessionState::new(config, question)))
    }

    pub async fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::invalid_state("No interview has been started"));
        };
        if state.is_terminal() || state.current_question.is_empty() {
            return Err(Error::invalid_state("The interview has already finished"));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::invalid_field("answer", "required", "Answer is required"));
        }

        let evaluation = self
            .collaborators
            .evaluate(&state.config, &state.current_question, answer)
            .await;
        let question = std::mem::take(&mut state.current_question);
        let record = QaRecord::new(question, answer.to_string(), evaluation);
        state.history.push(record.clone());
        state.step += 1;
        tracing::info!(step = state.step, score = record.score, "Answer recorded");

        if state.is_terminal() {
            tracing::info!(answers = state.history.len(), "Interview completed");
            return Ok(AnswerOutcome {
                record,
                step: state.step,
                next_question: None,
            });
        }

        state.current_question = self.collaborators.ask(&state.config, &state.history).await;
        Ok(AnswerOutcome {
            record,
            step: state.step,
            next_question: Some(state.current_question.clone()),
        })
    }

    pub async fn summary(&self) -> Result<SummaryReport> {
        let state = match &self.state {
            Some(state) if state.is_terminal() => state,
            _ => {
                return Err(Error::invalid_state(
                    "The summary is only available once all questions are answered",
                ))
            }
        };

        let mut report = self.collaborators.summarize(&state.history).await;
        let final_score = GradingService::final_score(&state.history);
        if (report.final_score - final_score).abs() > f64::EPSILON {
            tracing::debug!(
                reported = report.final_score,
                computed = final_score,
                "Replacing summarizer score with answer mean"
            );
        }
        report.final_score = final_score;
        Ok(report)
    }

    pub fn restart(&mut self) {
        if self.state.take().is_some() {
            tracing::info!("Interview restarted");
        }
    }
}
