use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docqa::api::{create_router, AppState};
use docqa::application::{DocumentService, QaService, SearchService};
use docqa::infrastructure::{Config, GeminiClient, InMemoryVectorStore, SnapshotWriter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,docqa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env());

    let gemini = Arc::new(GeminiClient::new(config.gemini.clone()));
    let store = Arc::new(InMemoryVectorStore::new());
    let snapshots = SnapshotWriter::new(&config.documents_path);

    let document_service = Arc::new(DocumentService::new(
        store.clone(),
        gemini.clone(),
        snapshots,
        &config,
    ));
    let search_service = Arc::new(SearchService::new(
        gemini.clone(),
        store,
        config.search.clone(),
    ));
    let qa_service = Arc::new(QaService::new(search_service.clone(), gemini));

    let state = AppState::new(document_service, search_service, qa_service, config.clone());
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
