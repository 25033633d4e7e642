use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("File validation error: {0}")]
    FileValidation(String),

    #[error("Document processing error: {0}")]
    DocumentProcessing(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn file_validation(msg: impl Into<String>) -> Self {
        Self::FileValidation(msg.into())
    }

    pub fn document_processing(msg: impl Into<String>) -> Self {
        Self::DocumentProcessing(msg.into())
    }

    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code for the API error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileValidation(_) => "FILE_VALIDATION_ERROR",
            Self::DocumentProcessing(_) => "DOCUMENT_PROCESSING_ERROR",
            Self::Search(_) => "SEARCH_ERROR",
            Self::Embedding(_) => "EMBEDDING_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
