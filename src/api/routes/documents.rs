use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::domain::{Document, DomainError};

/// Document metadata without the full extracted text.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: &'static str,
    pub size: u64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub chunk_count: usize,
    pub status: &'static str,
}

impl From<Document> for DocumentSummary {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            title: doc.title,
            doc_type: doc.doc_type.as_str(),
            size: doc.size,
            uploaded_at: doc.uploaded_at,
            processed_at: doc.processed_at,
            chunk_count: doc.chunk_count,
            status: doc.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub documents: Vec<DocumentSummary>,
    pub errors: Vec<String>,
    pub total_uploaded: usize,
    pub total_failed: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub success: bool,
    pub documents: Vec<DocumentSummary>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub success: bool,
    pub data: DocumentSummary,
}

#[derive(Debug, Serialize)]
pub struct ChunkView {
    pub id: String,
    pub content: String,
    pub chunk_index: usize,
    pub page_number: u32,
    pub has_embedding: bool,
}

#[derive(Debug, Serialize)]
pub struct ChunkListResponse {
    pub success: bool,
    pub document_id: Uuid,
    pub chunks: Vec<ChunkView>,
    pub total_chunks: usize,
}

/// Batch upload. Each file is processed independently; one bad file never
/// aborts the rest.
pub async fn ingest_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::file_validation(format!("Invalid multipart payload: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| DomainError::file_validation(format!("Failed to read '{filename}': {e}")))?;
        files.push((filename, data));
    }

    if files.is_empty() {
        return Err(DomainError::file_validation("No files provided").into());
    }
    let max_files = state.config.upload.max_files;
    if files.len() > max_files {
        return Err(DomainError::file_validation(format!(
            "Too many files. Maximum {max_files} files allowed"
        ))
        .into());
    }

    let mut documents = Vec::new();
    let mut errors = Vec::new();
    for (filename, data) in files {
        match state
            .document_service
            .process_document(&filename, &data)
            .await
        {
            Ok(doc) => documents.push(DocumentSummary::from(doc)),
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "failed to process uploaded file");
                errors.push(format!("{filename}: {e}"));
            }
        }
    }

    Ok(Json(UploadResponse {
        success: !documents.is_empty(),
        total_uploaded: documents.len(),
        total_failed: errors.len(),
        documents,
        errors,
    }))
}

pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let documents = state.document_service.list(query.skip, limit).await?;
    let total = state.document_service.count().await?;

    Ok(Json(DocumentListResponse {
        success: true,
        documents: documents.into_iter().map(DocumentSummary::from).collect(),
        total,
        page: query.skip / limit + 1,
        limit,
    }))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = state
        .document_service
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Document not found"))?;

    Ok(Json(DocumentResponse {
        success: true,
        data: DocumentSummary::from(document),
    }))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let document = state
        .document_service
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Document not found"))?;

    state.document_service.delete(id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Document '{}' deleted successfully", document.filename),
    })))
}

pub async fn get_document_chunks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChunkListResponse>, ApiError> {
    state
        .document_service
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Document not found"))?;

    let chunks = state.document_service.chunks(id).await?;
    let views: Vec<ChunkView> = chunks
        .into_iter()
        .map(|chunk| ChunkView {
            has_embedding: chunk.has_embedding(),
            id: chunk.id,
            content: chunk.content,
            chunk_index: chunk.chunk_index,
            page_number: chunk.page_number,
        })
        .collect();

    Ok(Json(ChunkListResponse {
        success: true,
        document_id: id,
        total_chunks: views.len(),
        chunks: views,
    }))
}

pub async fn document_stats(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let documents = state.document_service.list(0, usize::MAX).await?;

    let total = documents.len();
    let total_size: u64 = documents.iter().map(|d| d.size).sum();
    let total_chunks: usize = documents.iter().map(|d| d.chunk_count).sum();
    let avg_size = if total > 0 {
        total_size as f64 / total as f64
    } else {
        0.0
    };

    let mut by_status: HashMap<&str, usize> = HashMap::new();
    let mut by_type: HashMap<&str, usize> = HashMap::new();
    for doc in &documents {
        *by_status.entry(doc.status.as_str()).or_default() += 1;
        *by_type.entry(doc.doc_type.as_str()).or_default() += 1;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "stats": {
            "documents": {
                "total": total,
                "total_size_bytes": total_size,
                "avg_size_bytes": avg_size,
                "by_status": by_status,
                "by_type": by_type,
            },
            "vector_store": {
                "total_chunks": total_chunks,
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::application::{DocumentService, QaService, SearchService};
    use crate::domain::ports::{EmbeddingProvider, EmbeddingTask, GenerationProvider};
    use crate::domain::Embedding;
    use crate::infrastructure::{Config, InMemoryVectorStore, SnapshotWriter};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(
            &self,
            _text: &str,
            _task: EmbeddingTask,
        ) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![1.0, 0.0, 0.0]))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    struct FixedGenerator;

    #[async_trait]
    impl GenerationProvider for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Ok("answer".to_string())
        }
    }

    fn test_state(dir: &std::path::Path) -> AppState {
        let config = Arc::new(Config::from_env());
        let store = Arc::new(InMemoryVectorStore::new());
        let embedder = Arc::new(FixedEmbedder);

        let document_service = Arc::new(DocumentService::new(
            store.clone(),
            embedder.clone(),
            SnapshotWriter::new(dir),
            &config,
        ));
        let search_service = Arc::new(SearchService::new(
            embedder,
            store,
            config.search.clone(),
        ));
        let qa_service = Arc::new(QaService::new(
            search_service.clone(),
            Arc::new(FixedGenerator),
        ));

        AppState::new(document_service, search_service, qa_service, config)
    }

    fn multipart_request(parts: &[(&str, &[u8])]) -> Request<Body> {
        let boundary = "route-test-boundary";
        let mut body = Vec::new();
        for (filename, data) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/documents/ingest")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_partial_failure_processes_remaining_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let response = app
            .oneshot(multipart_request(&[
                ("good.txt", b"The cat sat. It was calm." as &[u8]),
                ("bad.png", b"not an allowed type" as &[u8]),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["total_uploaded"], 1);
        assert_eq!(json["total_failed"], 1);
        assert_eq!(json["documents"][0]["filename"], "good.txt");
        assert!(json["errors"][0]
            .as_str()
            .unwrap()
            .starts_with("bad.png:"));
    }

    #[tokio::test]
    async fn test_ingest_without_files_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let response = app.oneshot(multipart_request(&[])).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_aggregates_by_status_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        state
            .document_service
            .process_document("a.txt", b"The cat sat. It was calm.")
            .await
            .unwrap();
        state
            .document_service
            .process_document("b.txt", b"Another document with enough text.")
            .await
            .unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/documents/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        let stats = &json["stats"];
        assert_eq!(stats["documents"]["total"], 2);
        assert_eq!(stats["documents"]["by_status"]["completed"], 2);
        assert_eq!(stats["documents"]["by_type"]["txt"], 2);
        assert_eq!(stats["vector_store"]["total_chunks"], 2);
    }
}
