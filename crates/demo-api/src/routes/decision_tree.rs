//! POC decision tree routes
//!
//! The server keeps no sessions. Each call receives the caller's session and
//! returns the updated one.

use crate::error::ApiError;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use demo_core::decision::{OutcomeInfo, Question, QUESTIONS, TOTAL_STEPS};
use demo_core::{DecisionSession, Outcome, Progress};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub total_steps: u8,
    pub questions: &'static [Question],
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub session: DecisionSession,
    pub answer: String,
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub session: DecisionSession,
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Continue,
    Complete,
}

/// Session plus everything a front end needs to render it
#[derive(Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<&'static Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeInfo>,
    pub progress: Progress,
    pub session: DecisionSession,
}

impl From<DecisionSession> for SessionView {
    fn from(session: DecisionSession) -> Self {
        let question = session.current_question();
        let status = if session.is_complete() {
            SessionStatus::Complete
        } else {
            SessionStatus::Continue
        };

        Self {
            status,
            next_step: question.map(|q| q.step),
            question,
            outcome: session.outcome().map(|outcome| outcome.info()),
            progress: session.progress(),
            session,
        }
    }
}

pub async fn list_questions() -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        total_steps: TOTAL_STEPS,
        questions: &QUESTIONS,
    })
}

pub async fn list_outcomes() -> Json<Vec<OutcomeInfo>> {
    Json(Outcome::ALL.iter().map(Outcome::info).collect())
}

pub async fn start() -> Json<SessionView> {
    Json(DecisionSession::start().into())
}

pub async fn answer(
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(AnswerRequest {
        mut session,
        answer,
    }) = payload?;

    if let Some(outcome) = session.submit_answer(&answer)?.outcome() {
        log_outcome(&session, outcome);
    }

    Ok(Json(session.into()))
}

pub async fn back(
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(SessionRequest { mut session }) = payload?;
    session.step_back();
    Ok(Json(session.into()))
}

pub async fn evaluate(
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(request) = payload?;
    let (session, outcome) = DecisionSession::replay(request.answers.as_slice())?;

    if let Some(outcome) = outcome {
        log_outcome(&session, outcome);
    }

    Ok(Json(session.into()))
}

pub async fn export(
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let export = request.session.export()?;

    let disposition = format!("attachment; filename=\"{}\"", export.file_name());

    Ok((
        StatusCode::OK,
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(export),
    )
        .into_response())
}

fn log_outcome(session: &DecisionSession, outcome: Outcome) {
    let responses: Vec<String> = session
        .responses()
        .iter()
        .map(|(step, answer)| format!("{}={}", step, answer))
        .collect();

    info!(
        result = %outcome,
        responses = %responses.join(","),
        "POC decision tree result"
    );
}
