use crate::core::error::MagicError;
use async_trait::async_trait;

pub mod base_client;
pub mod openrouter;
pub mod types;

pub use types::{Completion, ModelDescriptor};

/// The remote completion service. Each method performs exactly one request.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<Completion, MagicError>;

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, MagicError>;
}
