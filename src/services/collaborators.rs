//! Contracts for the three services the interview controller delegates to.
//!
//! Implementations may fail or hang; [`Collaborators`] wraps every call in a
//! timeout and turns failures into the documented fallbacks so a session can
//! always make progress.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::models::interview::{Evaluation, InterviewConfig, QaRecord, SummaryReport};

/// Question returned when no further question can be produced.
pub const NO_MORE_QUESTIONS: &str = "No more questions!";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Next question for the interview, ideally not among `prev_qas`.
    async fn next_question(
        &self,
        config: &InterviewConfig,
        prev_qas: &[QaRecord],
    ) -> anyhow::Result<String>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        config: &InterviewConfig,
        question: &str,
        answer: &str,
    ) -> anyhow::Result<Evaluation>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionSummarizer: Send + Sync {
    async fn summarize(&self, history: &[QaRecord]) -> anyhow::Result<SummaryReport>;
}

#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn QuestionGenerator>,
    pub evaluator: Arc<dyn AnswerEvaluator>,
    pub summarizer: Arc<dyn SessionSummarizer>,
    pub timeout: Duration,
}

impl Collaborators {
    pub fn new(
        generator: Arc<dyn QuestionGenerator>,
        evaluator: Arc<dyn AnswerEvaluator>,
        summarizer: Arc<dyn SessionSummarizer>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            evaluator,
            summarizer,
            timeout,
        }
    }

    pub async fn ask(&self, config: &InterviewConfig, prev_qas: &[QaRecord]) -> String {
        match timeout(self.timeout, self.generator.next_question(config, prev_qas)).await {
            Ok(Ok(question)) if !question.trim().is_empty() => question.trim().to_string(),
            Ok(Ok(_)) => {
                tracing::warn!(role = %config.role, "Question generator returned an empty question");
                NO_MORE_QUESTIONS.to_string()
            }
            Ok(Err(e)) => {
                tracing::warn!(error = ?e, role = %config.role, "Question generation failed");
                NO_MORE_QUESTIONS.to_string()
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Question generation timed out");
                NO_MORE_QUESTIONS.to_string()
            }
        }
    }

    pub async fn evaluate(
        &self,
        config: &InterviewConfig,
        question: &str,
        answer: &str,
    ) -> Evaluation {
        match timeout(self.timeout, self.evaluator.evaluate(config, question, answer)).await {
            Ok(Ok(mut evaluation)) => {
                evaluation.score = evaluation.score.min(10);
                evaluation
            }
            Ok(Err(e)) => {
                tracing::warn!(error = ?e, "Answer evaluation failed");
                Evaluation::unparsed()
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Answer evaluation timed out");
                Evaluation::unparsed()
            }
        }
    }

    pub async fn summarize(&self, history: &[QaRecord]) -> SummaryReport {
        match timeout(self.timeout, self.summarizer.summarize(history)).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                tracing::warn!(error = ?e, "Session summary failed");
                SummaryReport::default()
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Session summary timed out");
                SummaryReport::default()
            }
        }
    }
}
