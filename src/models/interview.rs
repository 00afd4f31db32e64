use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

pub const MAX_QUESTIONS: u32 = 5;

/// Feedback recorded when the evaluator's reply cannot be decoded.
pub const UNPARSED_FEEDBACK: &str = "Could not parse feedback.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterviewMode {
    Technical,
    Behavioral,
    Custom(String),
}

impl From<String> for InterviewMode {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "technical" => InterviewMode::Technical,
            "behavioral" | "behavioural" => InterviewMode::Behavioral,
            _ => InterviewMode::Custom(trimmed.to_string()),
        }
    }
}

impl From<InterviewMode> for String {
    fn from(mode: InterviewMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for InterviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterviewMode::Technical => f.write_str("Technical"),
            InterviewMode::Behavioral => f.write_str("Behavioral"),
            InterviewMode::Custom(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub role: String,
    #[serde(default)]
    pub domain: Option<String>,
    pub mode: InterviewMode,
}

impl InterviewConfig {
    pub fn new(role: impl Into<String>, domain: Option<String>, mode: InterviewMode) -> Self {
        let domain = domain
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            role: role.into().trim().to_string(),
            domain,
            mode,
        }
    }

    /// Checks the fields that must be present once whitespace is trimmed.
    pub fn validate(&self) -> Result<()> {
        if self.role.is_empty() {
            return Err(Error::invalid_field("role", "required", "Role is required"));
        }
        if matches!(&self.mode, InterviewMode::Custom(m) if m.is_empty()) {
            return Err(Error::invalid_field("mode", "required", "Mode is required"));
        }
        Ok(())
    }

    /// Domain as shown to interviewers; absent domains read as "General".
    pub fn domain_label(&self) -> &str {
        self.domain.as_deref().unwrap_or("General")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub feedback: String,
    pub score: u8,
    pub suggestions: String,
}

impl QaRecord {
    pub fn new(question: String, answer: String, evaluation: Evaluation) -> Self {
        Self {
            question,
            answer,
            feedback: evaluation.feedback,
            score: evaluation.score,
            suggestions: evaluation.suggestions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub suggestions: String,
}

impl Evaluation {
    pub fn unparsed() -> Self {
        Self {
            feedback: UNPARSED_FEEDBACK.to_string(),
            score: 0,
            suggestions: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub strengths: String,
    pub improvements: String,
    pub resources: String,
    pub final_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_role_and_mode() {
        let blank_role = InterviewConfig::new("  ", None, InterviewMode::Technical);
        assert!(matches!(blank_role.validate(), Err(Error::Validation(_))));

        let blank_mode = InterviewConfig::new("SRE", None, InterviewMode::from(" ".to_string()));
        assert!(matches!(blank_mode.validate(), Err(Error::Validation(_))));

        let custom = InterviewConfig::new("SRE", None, InterviewMode::from("Pairing".to_string()));
        assert!(custom.validate().is_ok());
    }
}
