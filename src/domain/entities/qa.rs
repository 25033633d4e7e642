use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-facing attribution for one retrieved source. Deserializable so
/// clients can echo it back for explanation and follow-up requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationSource {
    pub document_id: Uuid,
    pub document_title: String,
    pub chunk_id: String,
    pub content: String,
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    pub relevance_score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaAnswer {
    pub success: bool,
    pub answer: String,
    pub sources: Vec<CitationSource>,
    pub confidence: f32,
    pub processing_time: f64,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QaAnswer {
    /// Well-formed degraded answer returned when the Q&A pipeline fails
    /// internally. Callers never see a raw error.
    pub fn degraded(
        message: impl Into<String>,
        session_id: impl Into<String>,
        processing_time: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            answer: message.into(),
            sources: Vec::new(),
            confidence: 0.0,
            processing_time,
            session_id: session_id.into(),
            error: Some(error.into()),
        }
    }
}
