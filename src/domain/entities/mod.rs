mod document;
mod embedding;
mod qa;

pub use document::{Document, DocumentChunk, DocumentStatus, DocumentType, SearchResult};
pub use embedding::Embedding;
pub use qa::{CitationSource, QaAnswer};
