use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::embedding::Embedding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Txt,
}

impl DocumentType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub chunk_count: usize,
    pub status: DocumentStatus,
}

impl Document {
    pub fn new(
        filename: impl Into<String>,
        doc_type: DocumentType,
        size: u64,
        content: impl Into<String>,
    ) -> Self {
        let filename = filename.into();
        let title = filename
            .rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or_else(|| filename.clone());

        Self {
            id: Uuid::new_v4(),
            filename,
            title,
            content: content.into(),
            doc_type,
            size,
            uploaded_at: Utc::now(),
            processed_at: None,
            chunk_count: 0,
            status: DocumentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub document_id: Uuid,
    pub content: String,
    pub page_number: u32,
    pub chunk_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Embedding>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl DocumentChunk {
    pub fn new(
        document_id: Uuid,
        content: impl Into<String>,
        page_number: u32,
        chunk_index: usize,
    ) -> Self {
        Self {
            id: format!("{document_id}_chunk_{chunk_index}"),
            document_id,
            content: content.into(),
            page_number,
            chunk_index,
            embedding: None,
            metadata: Map::new(),
        }
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// Transient pairing of a chunk with its owning document and scores.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub document: Document,
    pub similarity: f32,
    pub relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_title_strips_extension() {
        let doc = Document::new("resume.pdf", DocumentType::Pdf, 1024, "text");
        assert_eq!(doc.title, "resume");
        assert_eq!(doc.status, DocumentStatus::Pending);
    }

    #[test]
    fn test_document_title_without_extension() {
        let doc = Document::new("notes", DocumentType::Txt, 10, "text");
        assert_eq!(doc.title, "notes");
    }

    #[test]
    fn test_chunk_id_encodes_document_and_index() {
        let doc_id = Uuid::new_v4();
        let chunk = DocumentChunk::new(doc_id, "content", 1, 3);
        assert_eq!(chunk.id, format!("{doc_id}_chunk_3"));
        assert!(!chunk.has_embedding());
    }
}
