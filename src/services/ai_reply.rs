//! Decoding of chat-completion replies into interview types.
//!
//! Replies are validated against a fixed schema. Anything that does not fit
//! degrades to the documented defaults instead of surfacing an error.

use serde::Deserialize;

use crate::models::interview::{Evaluation, SummaryReport};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Text {
    One(String),
    Many(Vec<String>),
}

impl Text {
    fn into_string(self) -> String {
        match self {
            Text::One(s) => s.trim().to_string(),
            Text::Many(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Score {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Score {
    fn value(&self) -> Option<f64> {
        match self {
            Score::Int(i) => Some(*i as f64),
            Score::Float(f) => Some(*f),
            Score::Str(s) => s.trim().trim_end_matches("/10").trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EvaluationReply {
    feedback: Option<Text>,
    score: Option<Score>,
    suggestions: Option<Text>,
}

#[derive(Debug, Deserialize)]
struct SummaryReply {
    strengths: Option<Text>,
    improvements: Option<Text>,
    resources: Option<Text>,
    final_score: Option<Score>,
}

/// Removes a surrounding Markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn text(value: Option<Text>) -> String {
    value.map(Text::into_string).unwrap_or_default()
}

fn score_0_to_10(value: Option<Score>) -> Option<f64> {
    value
        .and_then(|s| s.value())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 10.0))
}

pub fn decode_evaluation(raw: &str) -> Evaluation {
    match serde_json::from_str::<EvaluationReply>(strip_code_fence(raw)) {
        Ok(reply) => Evaluation {
            feedback: text(reply.feedback),
            score: score_0_to_10(reply.score).map(|v| v.round() as u8).unwrap_or(0),
            suggestions: text(reply.suggestions),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Evaluation reply did not match schema");
            Evaluation::unparsed()
        }
    }
}

pub fn decode_summary(raw: &str) -> SummaryReport {
    match serde_json::from_str::<SummaryReply>(strip_code_fence(raw)) {
        Ok(reply) => SummaryReport {
            strengths: text(reply.strengths),
            improvements: text(reply.improvements),
            resources: text(reply.resources),
            final_score: score_0_to_10(reply.final_score).unwrap_or(0.0),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Summary reply did not match schema");
            SummaryReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::UNPARSED_FEEDBACK;

    #[test]
    fn decodes_well_formed_evaluation() {
        let eval = decode_evaluation(
            r#"{"feedback": "Good use of examples.", "score": 7, "suggestions": "Quantify impact."}"#,
        );
        assert_eq!(eval.feedback, "Good use of examples.");
        assert_eq!(eval.score, 7);
        assert_eq!(eval.suggestions, "Quantify impact.");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let eval = decode_evaluation(r#"{"feedback": "Short."}"#);
        assert_eq!(eval.feedback, "Short.");
        assert_eq!(eval.score, 0);
        assert_eq!(eval.suggestions, "");
    }

    #[test]
    fn lenient_scores_are_normalized() {
        assert_eq!(decode_evaluation(r#"{"score": 7.6}"#).score, 8);
        assert_eq!(decode_evaluation(r#"{"score": "6/10"}"#).score, 6);
        assert_eq!(decode_evaluation(r#"{"score": 42}"#).score, 10);
        assert_eq!(decode_evaluation(r#"{"score": -3}"#).score, 0);
        assert_eq!(decode_evaluation(r#"{"score": "great"}"#).score, 0);
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let raw = "```json\n{\"feedback\": \"Fine\", \"score\": 5, \"suggestions\": \"\"}\n```";
        let eval = decode_evaluation(raw);
        assert_eq!(eval.feedback, "Fine");
        assert_eq!(eval.score, 5);
    }

    #[test]
    fn malformed_evaluation_degrades() {
        for raw in ["Great answer! 8/10", "", "[1, 2]", r#"{"feedback": 12}"#] {
            let eval = decode_evaluation(raw);
            assert_eq!(eval.feedback, UNPARSED_FEEDBACK, "input: {raw}");
            assert_eq!(eval.score, 0);
            assert!(eval.suggestions.is_empty());
        }
    }

    #[test]
    fn summary_lists_are_joined() {
        let report = decode_summary(
            r#"{"strengths": ["Clear", "Concise"], "improvements": "Depth", "resources": [], "final_score": 8}"#,
        );
        assert_eq!(report.strengths, "Clear\nConcise");
        assert_eq!(report.improvements, "Depth");
        assert_eq!(report.resources, "");
        assert_eq!(report.final_score, 8.0);
    }

    #[test]
    fn malformed_summary_degrades() {
        assert_eq!(decode_summary("not json"), SummaryReport::default());
    }

    #[test]
    fn strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }
}
