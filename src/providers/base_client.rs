use crate::core::error::MagicError;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Thin JSON-over-HTTP client shared by provider implementations.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }
        request
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, MagicError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let request = self
            .with_headers(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(payload);
        Ok(request.send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response, MagicError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        Ok(self.with_headers(self.client.get(&url)).send().await?)
    }
}

/// Read a response body as JSON, returning both the typed view and the raw value.
///
/// Non-2xx statuses are not errors here: providers describe failures in the body.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<(T, Value), MagicError> {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "response received");

    let body = response.text().await?;
    let malformed = |detail: String| MagicError::MalformedResponse {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        detail,
        body: Some(body.clone()),
    };

    let raw: Value = serde_json::from_str(&body).map_err(|e| malformed(e.to_string()))?;
    let typed: T = serde_json::from_value(raw.clone()).map_err(|e| malformed(e.to_string()))?;
    Ok((typed, raw))
}
