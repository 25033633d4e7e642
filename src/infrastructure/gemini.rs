//! Gemini REST client implementing the embedding and generation ports.
//!
//! Provider responses arrive in more than one shape depending on API
//! version and endpoint, so decoding runs an ordered list of shape
//! matchers and normalizes everything to plain values before the rest of
//! the system sees it.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::domain::ports::{EmbeddingProvider, EmbeddingTask, GenerationProvider};
use crate::domain::{DomainError, Embedding};
use crate::infrastructure::config::GeminiConfig;
use crate::infrastructure::retry::retry_with_backoff;

/// Returned when the generation response carries no extractable text.
pub const FALLBACK_ANSWER: &str = "No se pudo generar una respuesta.";

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn model_url(&self, model: &str, action: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}?key={}",
            self.config.base_url, model, action, self.config.api_key
        )
    }

    async fn embed_once(&self, text: &str, task: EmbeddingTask) -> Result<Embedding, DomainError> {
        let url = self.model_url(&self.config.embedding_model, "embedContent");
        let body = json!({
            "content": { "parts": [{ "text": text }] },
            "taskType": task.as_str(),
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::embedding(format!("embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::embedding(format!(
                "embedding request returned {status}: {detail}"
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| DomainError::embedding(format!("invalid embedding response: {e}")))?;

        decode_embedding(&value)
            .map(Embedding::new)
            .ok_or_else(|| DomainError::embedding("unrecognized embedding response shape"))
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Embedding, DomainError> {
        debug!(text_len = text.len(), task = task.as_str(), "embedding text");

        retry_with_backoff(
            self.config.retry_attempts,
            self.config.retry_base_delay,
            self.config.retry_max_delay,
            || self.embed_once(text, task),
        )
        .await
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let url = self.model_url(&self.config.generation_model, "generateContent");
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::generation(format!("generation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, "generation request failed");
            return Err(DomainError::generation(format!(
                "generation request returned {status}: {detail}"
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| DomainError::generation(format!("invalid generation response: {e}")))?;

        Ok(extract_answer_text(&value).unwrap_or_else(|| FALLBACK_ANSWER.to_string()))
    }
}

/// Normalizes the known embedding response shapes to a flat vector:
/// a list of embeddings, a wrapped single embedding, a bare values
/// object, or a plain array.
fn decode_embedding(value: &Value) -> Option<Vec<f32>> {
    if let Some(values) = value.pointer("/embeddings/0/values") {
        return decode_f32_array(values);
    }
    if let Some(values) = value.pointer("/embedding/values") {
        return decode_f32_array(values);
    }
    if let Some(embedding) = value.get("embedding") {
        if embedding.is_array() {
            return decode_f32_array(embedding);
        }
    }
    if let Some(values) = value.get("values") {
        return decode_f32_array(values);
    }
    if value.is_array() {
        return decode_f32_array(value);
    }
    None
}

fn decode_f32_array(value: &Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect()
}

/// Pulls answer text out of a generation response: either a direct `text`
/// field or the nested candidates/content/parts structure.
fn extract_answer_text(value: &Value) -> Option<String> {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_embeddings_list_shape() {
        let value = json!({ "embeddings": [{ "values": [0.1, 0.2, 0.3] }] });
        assert_eq!(decode_embedding(&value), Some(vec![0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_decode_wrapped_single_shape() {
        let value = json!({ "embedding": { "values": [1.0, 2.0] } });
        assert_eq!(decode_embedding(&value), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn test_decode_embedding_as_bare_array() {
        let value = json!({ "embedding": [0.5, 0.6] });
        assert_eq!(decode_embedding(&value), Some(vec![0.5, 0.6]));
    }

    #[test]
    fn test_decode_flat_vector_shape() {
        let value = json!([0.7, 0.8, 0.9]);
        assert_eq!(decode_embedding(&value), Some(vec![0.7, 0.8, 0.9]));
    }

    #[test]
    fn test_decode_rejects_unknown_shape() {
        let value = json!({ "unexpected": true });
        assert_eq!(decode_embedding(&value), None);
    }

    #[test]
    fn test_decode_rejects_non_numeric_values() {
        let value = json!({ "embedding": { "values": ["a", "b"] } });
        assert_eq!(decode_embedding(&value), None);
    }

    #[test]
    fn test_extract_direct_text() {
        let value = json!({ "text": "the answer" });
        assert_eq!(extract_answer_text(&value), Some("the answer".to_string()));
    }

    #[test]
    fn test_extract_candidates_parts_text() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "nested answer" }] }
            }]
        });
        assert_eq!(
            extract_answer_text(&value),
            Some("nested answer".to_string())
        );
    }

    #[test]
    fn test_extract_missing_text_is_none() {
        let value = json!({ "candidates": [] });
        assert_eq!(extract_answer_text(&value), None);
    }
}
