use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::domain::{DomainError, SearchResult};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
    pub threshold: Option<f32>,
    /// Comma-separated document ids to restrict the scan to.
    pub document_ids: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
    pub threshold: Option<f32>,
    pub document_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultView {
    pub chunk_id: String,
    pub document_id: Uuid,
    pub document_title: String,
    pub content: String,
    pub page_number: u32,
    pub chunk_index: usize,
    pub similarity: f32,
    pub relevance_score: f32,
}

impl From<SearchResult> for SearchResultView {
    fn from(result: SearchResult) -> Self {
        Self {
            chunk_id: result.chunk.id,
            document_id: result.document.id,
            document_title: result.document.title,
            content: result.chunk.content,
            page_number: result.chunk.page_number,
            chunk_index: result.chunk.chunk_index,
            similarity: result.similarity,
            relevance_score: result.relevance_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<SearchResultView>,
    pub query: String,
    pub total_results: usize,
    pub processing_time: f64,
}

pub async fn search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let document_ids = params
        .document_ids
        .as_deref()
        .map(parse_document_ids)
        .transpose()?;

    run_search(
        &state,
        params.q,
        params.limit,
        params.threshold,
        document_ids,
    )
    .await
}

pub async fn search_post(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(
        &state,
        request.query,
        request.limit,
        request.threshold,
        request.document_ids,
    )
    .await
}

async fn run_search(
    state: &AppState,
    query: String,
    limit: Option<usize>,
    threshold: Option<f32>,
    document_ids: Option<Vec<Uuid>>,
) -> Result<Json<SearchResponse>, ApiError> {
    if query.trim().is_empty() {
        return Err(DomainError::file_validation("Search query must not be empty").into());
    }
    let limit = limit.map(|l| l.clamp(1, 20));

    let start = Instant::now();
    let results = state
        .search_service
        .search(&query, limit, threshold, document_ids.as_deref())
        .await?;
    let processing_time = start.elapsed().as_secs_f64();

    tracing::info!(
        query = %query,
        results = results.len(),
        processing_time,
        "search completed"
    );

    Ok(Json(SearchResponse {
        success: true,
        total_results: results.len(),
        results: results.into_iter().map(SearchResultView::from).collect(),
        query,
        processing_time,
    }))
}

fn parse_document_ids(raw: &str) -> Result<Vec<Uuid>, DomainError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|_| DomainError::file_validation(format!("Invalid document id '{id}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_document_ids(&format!(" {a}, {b} ,")).unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn test_parse_document_ids_rejects_garbage() {
        assert!(parse_document_ids("not-a-uuid").is_err());
    }
}
