use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    ports::VectorStore, Document, DocumentChunk, DomainError, Embedding, SearchResult,
};

struct StoredDocument {
    document: Document,
    chunks: Vec<DocumentChunk>,
}

/// Process-lifetime vector store. A single `RwLock` over the whole entry
/// list makes `delete` atomic with respect to `search`: a reader either
/// sees a document with all its chunks or not at all.
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<StoredDocument>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn put(
        &self,
        document: Document,
        chunks: Vec<DocumentChunk>,
    ) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|entry| entry.document.id != document.id);
        entries.push(StoredDocument { document, chunks });
        Ok(())
    }

    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(entries
            .iter()
            .find(|entry| entry.document.id == document_id)
            .map(|entry| entry.document.clone()))
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Document>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut documents: Vec<Document> =
            entries.iter().map(|entry| entry.document.clone()).collect();
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        Ok(documents.into_iter().skip(skip).take(limit).collect())
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let before = entries.len();
        entries.retain(|entry| entry.document.id != document_id);
        Ok(entries.len() < before)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(entries.len())
    }

    async fn chunks_for(&self, document_id: Uuid) -> Result<Vec<DocumentChunk>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(entries
            .iter()
            .find(|entry| entry.document.id == document_id)
            .map(|entry| entry.chunks.clone())
            .unwrap_or_default())
    }

    async fn search(
        &self,
        query: &Embedding,
        limit: usize,
        threshold: f32,
        document_ids: Option<&[Uuid]>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results = Vec::new();
        for entry in entries.iter() {
            if let Some(filter) = document_ids {
                if !filter.contains(&entry.document.id) {
                    continue;
                }
            }

            for chunk in &entry.chunks {
                let Some(embedding) = &chunk.embedding else {
                    tracing::warn!(chunk_id = %chunk.id, "chunk has no embedding, skipping");
                    continue;
                };

                let similarity = query.cosine_similarity(embedding);
                if similarity >= threshold {
                    results.push(SearchResult {
                        chunk: chunk.clone(),
                        document: entry.document.clone(),
                        similarity,
                        relevance_score: similarity,
                    });
                }
            }
        }

        // Stable sort keeps insertion order for equal scores.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }
}
