use std::sync::Arc;

use crate::application::{DocumentService, QaService, SearchService};
use crate::infrastructure::Config;

#[derive(Clone)]
pub struct AppState {
    pub document_service: Arc<DocumentService>,
    pub search_service: Arc<SearchService>,
    pub qa_service: Arc<QaService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        document_service: Arc<DocumentService>,
        search_service: Arc<SearchService>,
        qa_service: Arc<QaService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            document_service,
            search_service,
            qa_service,
            config,
        }
    }
}
