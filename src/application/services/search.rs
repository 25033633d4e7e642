use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::domain::ports::{EmbeddingProvider, EmbeddingTask, VectorStore};
use crate::domain::{DomainError, SearchResult};
use crate::infrastructure::config::SearchConfig;

/// Orchestrates semantic search: embeds the query, then scans the store.
pub struct SearchService {
    embedding: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        config: SearchConfig,
    ) -> Self {
        Self {
            embedding,
            store,
            config,
        }
    }

    /// Searches every embedded chunk. `limit` and `threshold` fall back to
    /// configured defaults when not given.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
        threshold: Option<f32>,
        document_ids: Option<&[Uuid]>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let limit = limit.unwrap_or(self.config.default_limit);
        let threshold = threshold.unwrap_or(self.config.similarity_threshold);

        let query_embedding = self
            .embedding
            .embed(query, EmbeddingTask::RetrievalQuery)
            .await
            .map_err(|e| DomainError::search(format!("Failed to embed query: {e}")))?;

        self.store
            .search(&query_embedding, limit, threshold, document_ids)
            .await
            .map_err(|e| match e {
                DomainError::Search(_) => e,
                other => DomainError::search(format!("Retrieval failed: {other}")),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::VectorStore as _;
    use crate::domain::{Document, DocumentChunk, DocumentType, Embedding};
    use crate::infrastructure::InMemoryVectorStore;
    use async_trait::async_trait;

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(
            &self,
            _text: &str,
            _task: EmbeddingTask,
        ) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(self.0.clone()))
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(
            &self,
            _text: &str,
            _task: EmbeddingTask,
        ) -> Result<Embedding, DomainError> {
            Err(DomainError::embedding("no upstream"))
        }

        fn dimension(&self) -> usize {
            0
        }
    }

    async fn store_with_chunk(vector: Vec<f32>) -> Arc<InMemoryVectorStore> {
        let store = Arc::new(InMemoryVectorStore::new());
        let doc = Document::new("a.txt", DocumentType::Txt, 10, "content");
        let mut chunk = DocumentChunk::new(doc.id, "stored content here", 1, 0);
        chunk.embedding = Some(Embedding::new(vector));
        store.put(doc, vec![chunk]).await.unwrap();
        store
    }

    fn config() -> SearchConfig {
        SearchConfig {
            default_limit: 5,
            similarity_threshold: 0.4,
        }
    }

    #[tokio::test]
    async fn test_search_returns_matching_chunk() {
        let store = store_with_chunk(vec![1.0, 0.0]).await;
        let svc = SearchService::new(Arc::new(FixedEmbedder(vec![1.0, 0.0])), store, config());

        let results = svc.search("query", None, None, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].similarity - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_threshold_above_similarity_returns_empty() {
        // Stored chunk at 45 degrees from the query: similarity ~0.707.
        let store = store_with_chunk(vec![1.0, 1.0]).await;
        let svc = SearchService::new(Arc::new(FixedEmbedder(vec![1.0, 0.0])), store, config());

        let results = svc.search("unrelated", None, Some(0.99), None).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_surfaces_as_search_error() {
        let store = store_with_chunk(vec![1.0, 0.0]).await;
        let svc = SearchService::new(Arc::new(FailingEmbedder), store, config());

        let err = svc.search("query", None, None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Search(_)));
    }
}
