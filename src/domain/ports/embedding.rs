use async_trait::async_trait;

use crate::domain::{errors::DomainError, Embedding};

/// Task hint forwarded to the embedding backend so document and query
/// vectors land in compatible regions of the embedding space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    RetrievalDocument,
    RetrievalQuery,
}

impl EmbeddingTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            Self::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Embedding, DomainError>;
    fn dimension(&self) -> usize;
}
