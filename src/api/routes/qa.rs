use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::domain::{CitationSource, DomainError, QaAnswer};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub session_id: Option<String>,
    pub max_sources: Option<usize>,
}

pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<QaAnswer>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(DomainError::file_validation("Question must not be empty").into());
    }

    let max_sources = request.max_sources.unwrap_or(5).clamp(1, 10);
    let answer = state
        .qa_service
        .answer(&request.question, max_sources, request.session_id)
        .await;

    // Degraded answers still come back as 200 with success=false; the
    // composer never surfaces raw errors.
    Ok(Json(answer))
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<CitationSource>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub success: bool,
    pub explanation: String,
    pub processing_time: f64,
    pub sources_analyzed: usize,
}

/// Transparency endpoint: explains how an earlier answer was derived from
/// the sources the client echoes back.
pub async fn explain_answer(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let start = Instant::now();
    let explanation = state
        .qa_service
        .explain(&request.question, &request.answer, &request.sources)
        .await?;

    Ok(Json(ExplainResponse {
        success: true,
        explanation,
        processing_time: start.elapsed().as_secs_f64(),
        sources_analyzed: request.sources.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub question: String,
    pub previous_question: String,
    pub previous_answer: String,
    pub max_sources: Option<usize>,
}

pub async fn ask_follow_up(
    State(state): State<AppState>,
    Json(request): Json<FollowUpRequest>,
) -> Result<Json<QaAnswer>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(DomainError::file_validation("Question must not be empty").into());
    }

    let max_sources = request.max_sources.unwrap_or(5).clamp(1, 10);
    let answer = state
        .qa_service
        .follow_up(
            &request.question,
            &request.previous_question,
            &request.previous_answer,
            max_sources,
        )
        .await;

    Ok(Json(answer))
}
