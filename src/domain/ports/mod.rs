mod embedding;
mod generation;
mod vector_store;

pub use embedding::{EmbeddingProvider, EmbeddingTask};
pub use generation::GenerationProvider;
pub use vector_store::VectorStore;
