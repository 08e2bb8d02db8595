use super::CompletionBackend;
use crate::core::error::MagicError;
use crate::providers::base_client::{HttpClient, read_json};
use crate::providers::types::{
    Completion, CompletionRequest, CompletionResponse, ModelDescriptor, ModelList, error_message,
};
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const APP_TITLE: &str = "Magic Command";

#[derive(Clone)]
pub struct OpenRouterClient {
    client: HttpClient,
}

impl OpenRouterClient {
    /// The catalog is public, so `api_key` is only required for completions.
    pub fn with_endpoint(endpoint: String, api_key: Option<String>) -> Self {
        let auth_header = api_key.map(|key| ("Authorization".to_string(), format!("Bearer {}", key)));
        let extra_headers = HashMap::from([("X-Title".to_string(), APP_TITLE.to_string())]);

        Self {
            client: HttpClient::new(endpoint, auth_header, Some(extra_headers)),
        }
    }
}

#[async_trait::async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<Completion, MagicError> {
        let payload = CompletionRequest::ask(model, system_prompt, user_query);
        let response = self.client.post("chat/completions", &payload).await?;

        tracing::debug!("parsing response from API");
        let (parsed, raw) = read_json::<CompletionResponse>(response).await?;
        Completion::from_response(parsed, raw)
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, MagicError> {
        let response = self.client.get("models").await?;
        let (parsed, raw) = read_json::<ModelList>(response).await?;

        match parsed.data {
            Some(models) => {
                tracing::debug!(count = models.len(), "fetched model catalog");
                Ok(models)
            }
            None => {
                let message = error_message(parsed.error.as_ref(), &raw);
                Err(MagicError::api(message, raw))
            }
        }
    }
}
