pub mod documents;
pub mod health;
pub mod qa;
pub mod search;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::delete, routing::get, routing::post, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.allowed_origins);
    let upload_limit =
        state.config.upload.max_file_size as usize * state.config.upload.max_files;

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/documents/ingest", post(documents::ingest_documents))
        .route("/documents", get(documents::list_documents))
        .route("/documents/stats", get(documents::document_stats))
        .route("/documents/{id}", get(documents::get_document))
        .route("/documents/{id}", delete(documents::delete_document))
        .route("/documents/{id}/chunks", get(documents::get_document_chunks))
        .route("/search", get(search::search_get))
        .route("/search", post(search::search_post))
        .route("/qa/ask", post(qa::ask_question))
        .route("/qa/explain", post(qa::explain_answer))
        .route("/qa/follow-up", post(qa::ask_follow_up))
}
