use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::application::services::SearchService;
use crate::domain::ports::GenerationProvider;
use crate::domain::{CitationSource, DomainError, QaAnswer, SearchResult};

/// Apologetic message returned when the pipeline fails internally.
const ERROR_ANSWER: &str =
    "Lo siento, ocurrió un error al procesar tu pregunta. Por favor intenta nuevamente.";

/// Answer composer: retrieval, citation assembly, grounded generation and
/// confidence scoring. Never returns an error to its caller.
pub struct QaService {
    search: Arc<SearchService>,
    generation: Arc<dyn GenerationProvider>,
}

impl QaService {
    pub fn new(search: Arc<SearchService>, generation: Arc<dyn GenerationProvider>) -> Self {
        Self { search, generation }
    }

    /// Answers `question` grounded in at most `max_sources` retrieved
    /// chunks. All internal failures become a degraded but well-formed
    /// answer; a user-facing Q&A call never surfaces a raw error.
    #[instrument(skip(self), fields(question_len = question.len()))]
    pub async fn answer(
        &self,
        question: &str,
        max_sources: usize,
        session_id: Option<String>,
    ) -> QaAnswer {
        let start = Instant::now();
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.answer_inner(question, max_sources).await {
            Ok((answer, sources)) => {
                let confidence = confidence_score(sources.len());
                info!(
                    sources = sources.len(),
                    confidence, "question answered"
                );
                QaAnswer {
                    success: true,
                    answer,
                    sources,
                    confidence,
                    processing_time: start.elapsed().as_secs_f64(),
                    session_id,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Q&A pipeline failed");
                QaAnswer::degraded(
                    ERROR_ANSWER,
                    session_id,
                    start.elapsed().as_secs_f64(),
                    e.to_string(),
                )
            }
        }
    }

    /// Asks the generator to explain how an existing answer was derived
    /// from its cited sources. Unlike `answer`, failures surface to the
    /// caller here; there is no degraded explanation.
    pub async fn explain(
        &self,
        question: &str,
        answer: &str,
        sources: &[CitationSource],
    ) -> Result<String, DomainError> {
        let prompt = build_explanation_prompt(question, answer, sources);
        self.generation.generate(&prompt).await
    }

    /// Re-runs the Q&A flow with the previous exchange folded into the
    /// question, so the generator keeps conversational continuity.
    pub async fn follow_up(
        &self,
        question: &str,
        previous_question: &str,
        previous_answer: &str,
        max_sources: usize,
    ) -> QaAnswer {
        let contextual = format!(
            "Pregunta anterior: {previous_question}\n\
             Respuesta anterior: {previous_answer}\n\n\
             Pregunta de seguimiento: {question}"
        );
        self.answer(&contextual, max_sources, None).await
    }

    async fn answer_inner(
        &self,
        question: &str,
        max_sources: usize,
    ) -> Result<(String, Vec<CitationSource>), DomainError> {
        // Q&A always uses the configured threshold; callers cannot lower it.
        let results = self
            .search
            .search(question, Some(max_sources), None, None)
            .await?;

        let sources: Vec<CitationSource> = results.iter().map(citation_from).collect();
        let prompt = build_prompt(question, &results);
        let answer = self.generation.generate(&prompt).await?;

        Ok((answer, sources))
    }
}

/// More corroborating sources raise confidence up to a cap; scaled down
/// from 1.0 because no answer-grounding verification is performed.
fn confidence_score(source_count: usize) -> f32 {
    (source_count as f32 / 3.0).min(1.0) * 0.9
}

fn citation_from(result: &SearchResult) -> CitationSource {
    let line_number = result
        .chunk
        .metadata
        .get("line_number")
        .and_then(Value::as_u64)
        .map(|n| n as u32);

    CitationSource {
        document_id: result.document.id,
        document_title: result.document.title.clone(),
        chunk_id: result.chunk.id.clone(),
        content: result.chunk.content.clone(),
        page_number: result.chunk.page_number,
        line_number,
        relevance_score: result.relevance_score,
    }
}

fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    let context = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Source {} ({}, página {}):\n{}",
                i + 1,
                r.document.title,
                r.chunk.page_number,
                r.chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Eres un asistente especializado en análisis de documentos.\n\
         Debes responder de manera clara, concisa y profesional.\n\n\
         CONTEXTO DEL DOCUMENTO:\n{context}\n\n\
         PREGUNTA DEL USUARIO: {question}\n\n\
         INSTRUCCIONES ESPECÍFICAS:\n\
         1. Responde de manera directa y concisa\n\
         2. Destaca información clave con **negritas**\n\
         3. Incluye citas de fuentes al final de cada sección relevante\n\
         4. Mantén un tono profesional y objetivo\n\
         5. NO uses emojis ni elementos decorativos\n\n\
         FORMATO DE RESPUESTA:\n\
         - Usa encabezados ## para secciones principales\n\
         - Usa listas con viñetas para enumerar información\n\
         - Destaca datos importantes con **negritas**\n\n\
         RESPUESTA:"
    )
}

fn build_explanation_prompt(question: &str, answer: &str, sources: &[CitationSource]) -> String {
    let source_context = sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Fuente {} ({}):\n{}", i + 1, s.document_title, s.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Explica cómo se derivó la siguiente respuesta a partir de las fuentes proporcionadas:\n\n\
         PREGUNTA: {question}\n\n\
         RESPUESTA: {answer}\n\n\
         FUENTES UTILIZADAS:\n{source_context}\n\n\
         Por favor explica:\n\
         1. Qué información específica de cada fuente se utilizó\n\
         2. Cómo se combinó la información para formar la respuesta\n\
         3. Qué nivel de confianza se puede tener en esta respuesta\n\n\
         EXPLICACIÓN:"
    )
}
