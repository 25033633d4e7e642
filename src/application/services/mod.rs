mod document;
mod qa;
mod search;

pub use document::DocumentService;
pub use qa::QaService;
pub use search::SearchService;
