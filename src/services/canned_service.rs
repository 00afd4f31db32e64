use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::models::interview::{Evaluation, InterviewConfig, InterviewMode, QaRecord, SummaryReport};
use crate::services::collaborators::{
    AnswerEvaluator, QuestionGenerator, SessionSummarizer, NO_MORE_QUESTIONS,
};
use crate::services::grading_service::GradingService;

const TECHNICAL_QUESTIONS: &[&str] = &[
    "Walk me through how you would design a service that has to scale with demand in {domain}.",
    "What is the hardest bug you have tracked down as a {role}, and how did you find the root cause?",
    "How do you decide between building a component yourself and adopting an existing library or service?",
    "How do you test your work as a {role} before it reaches production?",
    "A system you own suddenly gets slower. How would you diagnose the problem?",
    "Describe a trade-off between performance and maintainability that you had to make recently.",
    "Which tools and practices in {domain} do you consider essential for a {role}, and why?",
];

const BEHAVIORAL_QUESTIONS: &[&str] = &[
    "Tell me about a time you disagreed with a teammate. How did you resolve it?",
    "Describe a project that did not go as planned. What did you learn as a {role}?",
    "Give an example of how you handled a tight deadline.",
    "Tell me about a time you took ownership of a problem outside your responsibilities.",
    "Describe a situation where you had to explain a complex topic in {domain} to a non-expert.",
    "Tell me about feedback you received that changed how you work.",
];

const GENERAL_QUESTIONS: &[&str] = &[
    "Why are you interested in working as a {role}?",
    "What would a great first 90 days look like for you as a {role}?",
    "Which recent development in {domain} excites you the most?",
    "What strengths would you bring to a team working in {domain}?",
    "How do you keep your skills current?",
    "Where do you want to grow over the next few years?",
];

const BEHAVIORAL_MARKERS: &[&str] = &[
    "for example",
    "for instance",
    "when i",
    "i led",
    "situation",
    "my team",
];

const OUTCOME_MARKERS: &[&str] = &["result", "outcome", "learned", "impact", "improved", "reduced"];

/// Interviewer backed by a fixed question bank and heuristic scoring.
/// Used when no language model is configured.
#[derive(Clone, Default)]
pub struct CannedInterviewer;

impl CannedInterviewer {
    pub fn new() -> Self {
        Self
    }

    fn bank(mode: &InterviewMode) -> &'static [&'static str] {
        match mode {
            InterviewMode::Technical => TECHNICAL_QUESTIONS,
            InterviewMode::Behavioral => BEHAVIORAL_QUESTIONS,
            InterviewMode::Custom(_) => GENERAL_QUESTIONS,
        }
    }

    fn render(template: &str, config: &InterviewConfig) -> String {
        let domain = config.domain.as_deref().unwrap_or("your field");
        template.replace("{role}", &config.role).replace("{domain}", domain)
    }

    fn score(config: &InterviewConfig, question: &str, answer: &str) -> u8 {
        let words = answer.split_whitespace().count();
        let lowered = answer.to_lowercase();

        let mut score: usize = match words {
            0..=4 => 1,
            5..=19 => 3,
            20..=59 => 5,
            _ => 6,
        };

        match config.mode {
            InterviewMode::Behavioral => {
                score += BEHAVIORAL_MARKERS
                    .iter()
                    .filter(|m| lowered.contains(*m))
                    .count()
                    .min(2);
                if OUTCOME_MARKERS.iter().any(|m| lowered.contains(m)) {
                    score += 2;
                }
            }
            InterviewMode::Technical => {
                let context = format!("{} {} {}", question, config.role, config.domain_label())
                    .to_lowercase();
                let mut terms: Vec<&str> = context
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|t| t.len() > 4)
                    .collect();
                terms.sort_unstable();
                terms.dedup();
                score += terms.iter().filter(|t| lowered.contains(*t)).count().min(3);
                if answer.chars().any(|c| c.is_ascii_digit()) {
                    score += 1;
                }
            }
            InterviewMode::Custom(_) => {
                if words >= 30 {
                    score += 2;
                }
                if lowered.contains(&config.role.to_lowercase()) {
                    score += 1;
                }
            }
        }

        score.min(10) as u8
    }

    fn feedback(score: u8) -> &'static str {
        match score {
            0..=3 => "The answer is too brief to show your experience.",
            4..=6 => "A reasonable answer that covers the basics.",
            7..=8 => "A clear, well-structured answer.",
            _ => "An excellent, thorough answer.",
        }
    }

    fn suggestions(mode: &InterviewMode, words: usize) -> String {
        let advice = match mode {
            InterviewMode::Technical => {
                "Name concrete technologies, explain the trade-offs and say how you would verify the result."
            }
            InterviewMode::Behavioral => {
                "Use the STAR structure (situation, task, action, result) and finish with a measurable outcome."
            }
            InterviewMode::Custom(_) => "Tie your answer back to the role and give a specific example.",
        };
        if words < 20 {
            format!("Expand your answer with more detail. {}", advice)
        } else {
            advice.to_string()
        }
    }
}

#[async_trait]
impl QuestionGenerator for CannedInterviewer {
    async fn next_question(
        &self,
        config: &InterviewConfig,
        prev_qas: &[QaRecord],
    ) -> anyhow::Result<String> {
        let unused: Vec<String> = Self::bank(&config.mode)
            .iter()
            .map(|t| Self::render(t, config))
            .filter(|q| !prev_qas.iter().any(|qa| &qa.question == q))
            .collect();

        let mut rng = rand::thread_rng();
        Ok(unused
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| NO_MORE_QUESTIONS.to_string()))
    }
}

#[async_trait]
impl AnswerEvaluator for CannedInterviewer {
    async fn evaluate(
        &self,
        config: &InterviewConfig,
        question: &str,
        answer: &str,
    ) -> anyhow::Result<Evaluation> {
        let score = Self::score(config, question, answer);
        Ok(Evaluation {
            feedback: Self::feedback(score).to_string(),
            score,
            suggestions: Self::suggestions(&config.mode, answer.split_whitespace().count()),
        })
    }
}

#[async_trait]
impl SessionSummarizer for CannedInterviewer {
    async fn summarize(&self, history: &[QaRecord]) -> anyhow::Result<SummaryReport> {
        let ranked = GradingService::rank(history);

        let strengths: Vec<String> = ranked
            .iter()
            .map(|&i| &history[i])
            .filter(|qa| qa.score >= 7)
            .take(2)
            .map(|qa| format!("Strong answer to \"{}\"", qa.question))
            .collect();

        let improvements: Vec<String> = ranked
            .iter()
            .rev()
            .map(|&i| &history[i])
            .filter(|qa| qa.score < 7)
            .take(2)
            .map(|qa| {
                if qa.suggestions.is_empty() {
                    format!("Revisit \"{}\"", qa.question)
                } else {
                    format!("\"{}\": {}", qa.question, qa.suggestions)
                }
            })
            .collect();

        let resources = if history.is_empty() {
            String::new()
        } else {
            [
                "Practice answering out loud with a timer.",
                "Review the STAR method for structuring examples.",
                "Revisit the core concepts and tools listed in job descriptions for the role.",
            ]
            .join("\n")
        };

        Ok(SummaryReport {
            strengths: strengths.join("\n"),
            improvements: improvements.join("\n"),
            resources,
            final_score: GradingService::final_score(history),
        })
    }
}
