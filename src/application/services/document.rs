use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::ports::{EmbeddingProvider, EmbeddingTask, VectorStore};
use crate::domain::{
    segmenter, Document, DocumentChunk, DocumentStatus, DocumentType, DomainError,
};
use crate::infrastructure::config::{ChunkingConfig, Config, UploadConfig};
use crate::infrastructure::{extract, SnapshotWriter};

/// Ingestion collaborator: validates uploads, extracts text, segments it,
/// enriches chunks with embeddings and hands the result to the store.
pub struct DocumentService {
    store: Arc<dyn VectorStore>,
    embedding: Arc<dyn EmbeddingProvider>,
    snapshots: SnapshotWriter,
    upload: UploadConfig,
    chunking: ChunkingConfig,
    embedding_model: String,
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedding: Arc<dyn EmbeddingProvider>,
        snapshots: SnapshotWriter,
        config: &Config,
    ) -> Self {
        Self {
            store,
            embedding,
            snapshots,
            upload: config.upload.clone(),
            chunking: config.chunking.clone(),
            embedding_model: config.gemini.embedding_model.clone(),
        }
    }

    /// Checks extension, size and emptiness before any processing starts.
    pub fn validate_file(&self, filename: &str, size: u64) -> Result<DocumentType, DomainError> {
        if size == 0 {
            return Err(DomainError::file_validation("File is empty"));
        }
        if size > self.upload.max_file_size {
            return Err(DomainError::file_validation(format!(
                "File size ({size} bytes) exceeds maximum allowed ({} bytes)",
                self.upload.max_file_size
            )));
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !self.upload.allowed_extensions.contains(&extension) {
            return Err(DomainError::file_validation(format!(
                "File extension '{extension}' not allowed. Allowed: {}",
                self.upload.allowed_extensions.join(", ")
            )));
        }

        DocumentType::from_extension(&extension).ok_or_else(|| {
            DomainError::file_validation(format!("Unsupported document type '{extension}'"))
        })
    }

    /// Full pipeline for one uploaded file. The document only becomes
    /// visible to search once every surviving chunk carries an embedding.
    #[instrument(skip(self, data), fields(filename, size = data.len()))]
    pub async fn process_document(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<Document, DomainError> {
        let doc_type = self.validate_file(filename, data.len() as u64)?;
        let content = extract::extract_text(doc_type, data)?;

        let mut document = Document::new(filename, doc_type, data.len() as u64, content.clone());
        document.status = DocumentStatus::Processing;

        let chunks = self.build_chunks(&document, &content)?;
        let enriched = self.enrich_chunks(&document, chunks).await;

        document.chunk_count = enriched.len();
        document.processed_at = Some(chrono::Utc::now());
        document.status = DocumentStatus::Completed;

        self.store.put(document.clone(), enriched).await?;
        self.snapshots.write(&document).await;

        info!(document_id = %document.id, chunks = document.chunk_count, "document processed");
        Ok(document)
    }

    /// Segments extracted text and applies the post-filter: short chunks
    /// are dropped, page numbers below 1 are clamped, and zero surviving
    /// chunks fails the whole operation.
    fn build_chunks(
        &self,
        document: &Document,
        content: &str,
    ) -> Result<Vec<DocumentChunk>, DomainError> {
        let drafts = segmenter::segment(content, self.chunking.max_chunk_len);

        let mut chunks = Vec::new();
        for draft in drafts {
            if draft.content.trim().len() < self.chunking.min_chunk_len {
                warn!(
                    chunk_index = draft.chunk_index,
                    "skipping chunk, content too short"
                );
                continue;
            }

            let page_number = draft.page_number.max(1);
            let mut chunk =
                DocumentChunk::new(document.id, draft.content, page_number, draft.chunk_index);
            chunk.metadata = json!({
                "filename": document.filename,
                "pageNumber": page_number,
                "chunkIndex": chunk.chunk_index,
                "chunkType": "text",
                "wordCount": chunk.content.split_whitespace().count(),
                "charCount": chunk.content.len(),
            })
            .as_object()
            .cloned()
            .unwrap_or_default();

            chunks.push(chunk);
        }

        if chunks.is_empty() {
            return Err(DomainError::document_processing(
                "No valid chunks generated from document",
            ));
        }
        Ok(chunks)
    }

    /// Embeds each chunk exactly once and stamps denormalized document
    /// metadata. Chunks whose embedding fails after retries are dropped
    /// with a warning rather than stored unsearchable.
    async fn enrich_chunks(
        &self,
        document: &Document,
        chunks: Vec<DocumentChunk>,
    ) -> Vec<DocumentChunk> {
        let mut enriched = Vec::with_capacity(chunks.len());

        for mut chunk in chunks {
            let embedding = match self
                .embedding
                .embed(&chunk.content, EmbeddingTask::RetrievalDocument)
                .await
            {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(chunk_id = %chunk.id, error = %e, "dropping chunk without embedding");
                    continue;
                }
            };

            chunk.metadata.insert(
                "documentId".to_string(),
                json!(document.id.to_string()),
            );
            chunk
                .metadata
                .insert("documentTitle".to_string(), json!(document.title));
            chunk
                .metadata
                .insert("documentType".to_string(), json!(document.doc_type.as_str()));
            chunk.metadata.insert(
                "uploadDate".to_string(),
                json!(document.uploaded_at.to_rfc3339()),
            );
            chunk
                .metadata
                .insert("embeddingModel".to_string(), json!(self.embedding_model));
            chunk.metadata.insert(
                "embeddingDimension".to_string(),
                json!(embedding.dimension()),
            );

            chunk.embedding = Some(embedding);
            enriched.push(chunk);
        }

        enriched
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Document>, DomainError> {
        self.store.get(id).await
    }

    pub async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Document>, DomainError> {
        self.store.list(skip, limit).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.store.count().await
    }

    pub async fn chunks(&self, id: Uuid) -> Result<Vec<DocumentChunk>, DomainError> {
        self.store.chunks_for(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            self.snapshots.remove(id).await;
            info!(document_id = %id, "document deleted");
        }
        Ok(deleted)
    }
}
