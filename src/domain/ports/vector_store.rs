use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Document, DocumentChunk, Embedding, SearchResult};

/// In-process store owning all documents and their embedded chunks.
///
/// All mutation funnels through these methods so atomicity of `delete` and
/// visibility-after-enrichment are guaranteed by the implementation's
/// locking discipline.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Stores a document with its chunk list, replacing any existing list
    /// for the same id. Chunks are expected to carry embeddings already.
    async fn put(
        &self,
        document: Document,
        chunks: Vec<DocumentChunk>,
    ) -> Result<(), DomainError>;

    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, DomainError>;

    /// Documents ordered by upload time, newest first, sliced by
    /// `skip`/`limit`. Concurrent inserts may shift pages; acceptable here.
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Document>, DomainError>;

    /// Removes a document and its chunks as one logical operation.
    /// Returns false if the id was unknown.
    async fn delete(&self, document_id: Uuid) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    async fn chunks_for(&self, document_id: Uuid) -> Result<Vec<DocumentChunk>, DomainError>;

    /// Full-scan cosine similarity search over every embedded chunk.
    /// Results are filtered by `threshold`, sorted descending (ties keep
    /// insertion order) and truncated to `limit`.
    async fn search(
        &self,
        query: &Embedding,
        limit: usize,
        threshold: f32,
        document_ids: Option<&[Uuid]>,
    ) -> Result<Vec<SearchResult>, DomainError>;
}
