pub mod config;
pub mod extract;
pub mod gemini;
pub mod retry;
pub mod snapshot;
pub mod vector_store;

pub use config::Config;
pub use gemini::GeminiClient;
pub use snapshot::SnapshotWriter;
pub use vector_store::InMemoryVectorStore;
