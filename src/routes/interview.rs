use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use validator::Validate;

use crate::dto::interview_dto::{
    SessionSnapshot, StartInterviewRequest, StartInterviewResponse, SubmitAnswerRequest,
    SubmitAnswerResponse, SummaryResponse,
};
use crate::middleware::session::SessionToken;
use crate::models::interview::MAX_QUESTIONS;
use crate::AppState;

/// Starts an interview. Without a token a new session is created; with one,
/// a previously restarted session is configured again.
#[axum::debug_handler]
pub async fn start_interview(
    State(state): State<AppState>,
    token: Option<SessionToken>,
    Json(req): Json<StartInterviewRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let config = req.into_config();
    config.validate()?;
    let (session_token, mut entry) = match token {
        Some(SessionToken(token)) => {
            let entry = state.sessions.acquire(&token).await?;
            (token, entry)
        }
        None => state.sessions.create().await,
    };

    let question = {
        let session = entry.interview.initialize(config).await?;
        session.current_question.clone()
    };
    let status = entry.interview.status();

    let resp = StartInterviewResponse {
        session_token,
        status,
        step: 1,
        max_steps: MAX_QUESTIONS,
        question,
    };
    Ok((StatusCode::CREATED, Json(resp)).into_response())
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> crate::error::Result<Response> {
    let entry = state.sessions.acquire(&token).await?;
    let snapshot = SessionSnapshot::new(
        entry.interview.status(),
        entry.interview.state(),
        entry.created_at,
    );
    Ok(Json(snapshot).into_response())
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Json(req): Json<SubmitAnswerRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let mut entry = state.sessions.acquire(&token).await?;
    let outcome = entry.interview.submit_answer(&req.answer).await?;

    let resp = SubmitAnswerResponse {
        completed: outcome.next_question.is_none(),
        record: outcome.record,
        step: outcome.step,
        max_steps: MAX_QUESTIONS,
        next_question: outcome.next_question,
    };
    Ok(Json(resp).into_response())
}

#[axum::debug_handler]
pub async fn get_summary(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> crate::error::Result<Response> {
    let entry = state.sessions.acquire(&token).await?;
    let summary = entry.interview.summary().await?;
    let history = entry
        .interview
        .state()
        .map(|s| s.history.clone())
        .unwrap_or_default();
    Ok(Json(SummaryResponse { history, summary }).into_response())
}

#[axum::debug_handler]
pub async fn restart(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> crate::error::Result<Response> {
    let mut entry = state.sessions.acquire(&token).await?;
    entry.interview.restart();
    Ok(Json(json!({ "status": entry.interview.status() })).into_response())
}
