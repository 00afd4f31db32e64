use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::interview::{Evaluation, InterviewConfig, InterviewMode, QaRecord, SummaryReport};
use crate::services::ai_reply::{decode_evaluation, decode_summary};
use crate::services::collaborators::{AnswerEvaluator, QuestionGenerator, SessionSummarizer};

const TEMPERATURE: f32 = 0.7;
const QUESTION_MAX_TOKENS: u32 = 100;
const REPLY_MAX_TOKENS: u32 = 200;

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    r#type: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct RespChoiceMsg {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RespChoice {
    message: RespChoiceMsg,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<RespChoice>,
}

/// Interviewer backed by an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AIService {
    pub fn new(api_key: String, base_url: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    async fn chat(&self, system_prompt: String, max_tokens: u32, json_reply: bool) -> anyhow::Result<String> {
        let req = Req {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens,
            response_format: json_reply.then_some(ResponseFormat {
                r#type: "json_object",
            }),
            messages: vec![Msg {
                role: "system",
                content: system_prompt,
            }],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("chat completion request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API Error {}: {}", status, text);
        }

        let body: Resp = res.json().await.context("invalid chat completion body")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("chat completion returned no content"))
    }
}

fn previous_qas(prev_qas: &[QaRecord]) -> String {
    if prev_qas.is_empty() {
        return "None".to_string();
    }
    let items: Vec<_> = prev_qas
        .iter()
        .map(|qa| json!({ "question": qa.question, "answer": qa.answer }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

fn question_prompt(config: &InterviewConfig, prev_qas: &[QaRecord]) -> String {
    format!(
        "You are an expert interviewer hiring a {role} ({domain}).\n\
         Interview mode: {mode}.\n\
         Ask one new question that fits this role and mode.\n\
         Never repeat a question that was already asked.\n\
         Questions and answers so far: {previous}.\n\
         Reply with the question text only.",
        role = config.role,
        domain = config.domain_label(),
        mode = config.mode,
        previous = previous_qas(prev_qas),
    )
}

fn evaluation_prompt(config: &InterviewConfig, question: &str, answer: &str) -> String {
    let focus = match config.mode {
        InterviewMode::Behavioral => "whether it draws on concrete real-world examples",
        InterviewMode::Technical => "its technical accuracy",
        InterviewMode::Custom(_) => {
            "its technical accuracy (for technical questions) or its use of real-world examples (for behavioral ones)"
        }
    };
    format!(
        "You are an expert interviewer hiring a {role} ({domain}).\n\
         Interview mode: {mode}.\n\
         Question: {question}\n\
         Candidate's answer: {answer}\n\
         Judge the answer on clarity, correctness, completeness and {focus}.\n\
         Give feedback, a score out of 10 and suggestions for improvement.\n\
         Reply with JSON only: {{\"feedback\": \"...\", \"score\": 7, \"suggestions\": \"...\"}}",
        role = config.role,
        domain = config.domain_label(),
        mode = config.mode,
    )
}

fn summary_prompt(history: &[QaRecord]) -> anyhow::Result<String> {
    let transcript = serde_json::to_string(history)?;
    Ok(format!(
        "You are an expert interviewer.\n\
         Here are the interview questions, answers and feedback: {transcript}\n\
         Summarize the candidate's strengths and the areas to improve, and suggest learning resources.\n\
         Give a final score out of 10.\n\
         Reply with JSON only: {{\"strengths\": \"...\", \"improvements\": \"...\", \"resources\": \"...\", \"final_score\": 8}}"
    ))
}

#[async_trait]
impl QuestionGenerator for AIService {
    async fn next_question(
        &self,
        config: &InterviewConfig,
        prev_qas: &[QaRecord],
    ) -> anyhow::Result<String> {
        let question = self
            .chat(question_prompt(config, prev_qas), QUESTION_MAX_TOKENS, false)
            .await?;
        let question = question.trim().trim_matches('"').trim().to_string();
        if question.is_empty() {
            anyhow::bail!("model returned an empty question");
        }
        Ok(question)
    }
}

#[async_trait]
impl AnswerEvaluator for AIService {
    async fn evaluate(
        &self,
        config: &InterviewConfig,
        question: &str,
        answer: &str,
    ) -> anyhow::Result<Evaluation> {
        let raw = self
            .chat(evaluation_prompt(config, question, answer), REPLY_MAX_TOKENS, true)
            .await?;
        Ok(decode_evaluation(&raw))
    }
}

#[async_trait]
impl SessionSummarizer for AIService {
    async fn summarize(&self, history: &[QaRecord]) -> anyhow::Result<SummaryReport> {
        if history.is_empty() {
            return Ok(SummaryReport::default());
        }
        let raw = self
            .chat(summary_prompt(history)?, REPLY_MAX_TOKENS, true)
            .await?;
        Ok(decode_summary(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    fn record(question: &str) -> QaRecord {
        QaRecord {
            question: question.to_string(),
            answer: "I use REST APIs daily".to_string(),
            feedback: "Fine".to_string(),
            score: 6,
            suggestions: String::new(),
        }
    }

    #[test]
    fn question_prompt_defaults_domain_and_history() {
        let config = InterviewConfig::new("Backend Engineer", None, InterviewMode::Technical);
        let prompt = question_prompt(&config, &[]);
        assert!(prompt.contains("Backend Engineer (General)"));
        assert!(prompt.contains("Interview mode: Technical."));
        assert!(prompt.contains("so far: None."));
    }

    #[test]
    fn question_prompt_lists_previous_questions() {
        let config = InterviewConfig::new(
            "Data Analyst",
            Some("Healthcare".to_string()),
            InterviewMode::Behavioral,
        );
        let prompt = question_prompt(&config, &[record("Tell me about SQL joins.")]);
        assert!(prompt.contains("Data Analyst (Healthcare)"));
        assert!(prompt.contains("Tell me about SQL joins."));
    }

    #[test]
    fn evaluation_prompt_focus_follows_mode() {
        let technical = InterviewConfig::new("SRE", None, InterviewMode::Technical);
        let behavioral = InterviewConfig::new("SRE", None, InterviewMode::Behavioral);
        assert!(evaluation_prompt(&technical, "Q", "A").contains("technical accuracy"));
        assert!(evaluation_prompt(&behavioral, "Q", "A").contains("real-world examples"));
    }

    #[test]
    fn request_omits_response_format_for_plain_questions() {
        let req = Req {
            model: "gpt-3.5-turbo",
            temperature: TEMPERATURE,
            max_tokens: QUESTION_MAX_TOKENS,
            response_format: None,
            messages: vec![Msg {
                role: "system",
                content: "prompt".to_string(),
            }],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("response_format").is_none());
        assert_eq!(value["max_tokens"], 100);
    }

    type Captured = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    async fn completions(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let prompt = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
        captured.lock().unwrap().push((auth, body));

        let content = if prompt.contains("Candidate's answer") {
            "```json\n{\"feedback\": \"Clear and concrete.\", \"score\": \"8\", \"suggestions\": \"Mention caching.\"}\n```"
        } else if prompt.contains("Summarize") {
            r#"{"strengths": ["API design", "Clarity"], "improvements": "Depth on scaling", "resources": "Designing Data-Intensive Applications", "final_score": 7.5}"#
        } else {
            "  \"How would you version a public REST API?\"  "
        };
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
    }

    async fn stub_service() -> (AIService, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(captured.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let service = AIService::new(
            "sk-test".to_string(),
            format!("http://{}/v1/", addr),
            "gpt-test".to_string(),
            Client::new(),
        );
        (service, captured)
    }

    #[tokio::test]
    async fn chat_completions_round_trip_through_decoding() {
        let (service, captured) = stub_service().await;
        let config = InterviewConfig::new("Backend Engineer", None, InterviewMode::Technical);

        let question = service.next_question(&config, &[]).await.unwrap();
        assert_eq!(question, "How would you version a public REST API?");

        let evaluation = service
            .evaluate(&config, &question, "I use REST APIs daily")
            .await
            .unwrap();
        assert_eq!(
            evaluation,
            Evaluation {
                feedback: "Clear and concrete.".to_string(),
                score: 8,
                suggestions: "Mention caching.".to_string(),
            }
        );

        let report = service.summarize(&[record(&question)]).await.unwrap();
        assert_eq!(report.strengths, "API design\nClarity");
        assert_eq!(report.improvements, "Depth on scaling");
        assert_eq!(report.resources, "Designing Data-Intensive Applications");
        assert_eq!(report.final_score, 7.5);

        let requests = captured.lock().unwrap();
        assert_eq!(requests.len(), 3);
        for (auth, body) in requests.iter() {
            assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
            assert_eq!(body["model"], "gpt-test");
            assert_eq!(body["messages"][0]["role"], "system");
        }
        let (_, question_req) = &requests[0];
        assert_eq!(question_req["max_tokens"], 100);
        assert!(question_req.get("response_format").is_none());
        let (_, evaluation_req) = &requests[1];
        assert_eq!(evaluation_req["max_tokens"], 200);
        assert_eq!(evaluation_req["response_format"]["type"], "json_object");
        assert!(evaluation_req["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("I use REST APIs daily"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let service = AIService::new(
            "sk-test".to_string(),
            "http://127.0.0.1:9/v1".to_string(),
            "gpt-3.5-turbo".to_string(),
            Client::new(),
        );
        let config = InterviewConfig::new("SRE", None, InterviewMode::Technical);
        assert!(service.next_question(&config, &[]).await.is_err());
    }

    #[tokio::test]
    async fn empty_history_skips_the_model() {
        let service = AIService::new(
            "sk-test".to_string(),
            "http://127.0.0.1:9/v1".to_string(),
            "gpt-3.5-turbo".to_string(),
            Client::new(),
        );
        let report = service.summarize(&[]).await.unwrap();
        assert_eq!(report, SummaryReport::default());
    }
}
