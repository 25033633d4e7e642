use async_trait::async_trait;

use crate::domain::errors::DomainError;

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}
