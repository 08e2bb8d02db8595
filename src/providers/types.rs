use crate::core::error::MagicError;
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// The ask request: one system message followed by one user message.
    pub fn ask(model: &str, system_prompt: &str, user_query: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user_query.to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

impl CompletionResponse {
    /// Trimmed content of the first choice, if it is non-empty.
    pub fn answer(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
    }
}

/// A validated completion, ready to be displayed.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub total_tokens: Option<u64>,
    pub citations: Vec<String>,
    pub raw: Value,
}

impl Completion {
    /// Validate a parsed response. Any `error` field, or the lack of a usable
    /// first choice, is reported as [`MagicError::Api`].
    pub fn from_response(response: CompletionResponse, raw: Value) -> Result<Self, MagicError> {
        if let Some(error) = &response.error {
            let message = error_message(Some(error), &raw);
            return Err(MagicError::api(message, raw));
        }

        let Some(text) = response.answer().map(str::to_string) else {
            let message = error_message(None, &raw);
            return Err(MagicError::api(message, raw));
        };

        Ok(Self {
            text,
            total_tokens: response.usage.and_then(|u| u.total_tokens),
            citations: response.citations.unwrap_or_default(),
            raw,
        })
    }

    /// Unique citation hostnames in first-seen order, without a leading `www.`.
    pub fn sources(&self) -> Vec<String> {
        let mut hosts: Vec<String> = Vec::new();
        for citation in &self.citations {
            let Some(host) = Url::parse(citation.trim())
                .ok()
                .and_then(|url| url.host_str().map(str::to_string))
            else {
                continue;
            };
            let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

/// Fields of a provider error object, tried in order.
const ERROR_FIELDS: [&str; 3] = ["message", "code", "status"];

/// Pick the most useful message out of a provider error. Falls back to the
/// serialized error object, or to the whole body when there is no error object.
pub fn error_message(error: Option<&Value>, body: &Value) -> String {
    let Some(error) = error.filter(|e| !e.is_null()) else {
        return body.to_string();
    };

    ERROR_FIELDS
        .iter()
        .find_map(|field| error.get(*field).and_then(meaningful))
        .unwrap_or_else(|| error.to_string())
}

fn meaningful(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context_length: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub architecture: Architecture,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pricing: Pricing,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Architecture {
    #[serde(default, deserialize_with = "null_as_default")]
    pub input_modalities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_modalities: Vec<String>,
}

/// Price per token. Unknown prices are NaN so they never compare as valid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pricing {
    #[serde(default = "unknown_price", deserialize_with = "price")]
    pub prompt: f64,
    #[serde(default = "unknown_price", deserialize_with = "price")]
    pub completion: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            prompt: f64::NAN,
            completion: f64::NAN,
        }
    }
}

fn unknown_price() -> f64 {
    f64::NAN
}

/// Catalogs publish prices as decimal strings, sometimes as plain numbers.
fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct ModelList {
    pub data: Option<Vec<ModelDescriptor>>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> Result<Completion, MagicError> {
        let response: CompletionResponse = serde_json::from_value(raw.clone()).unwrap();
        Completion::from_response(response, raw)
    }

    #[test]
    fn extracts_trimmed_answer() {
        let completion = parse(json!({
            "choices": [{"message": {"content": "  ls -la  "}}],
            "usage": {"total_tokens": 42}
        }))
        .unwrap();
        assert_eq!(completion.text, "ls -la");
        assert_eq!(completion.total_tokens, Some(42));
        assert!(completion.citations.is_empty());
    }

    #[test]
    fn error_field_becomes_api_error() {
        let err = parse(json!({"error": {"message": "rate limited"}})).unwrap_err();
        match err {
            MagicError::Api { message, raw } => {
                assert_eq!(message, "rate limited");
                assert_eq!(raw, json!({"error": {"message": "rate limited"}}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_wins_even_with_choices() {
        let err = parse(json!({
            "choices": [{"message": {"content": "ls"}}],
            "error": {"code": 429}
        }))
        .unwrap_err();
        assert!(matches!(err, MagicError::Api { message, .. } if message == "429"));
    }

    #[test]
    fn empty_choices_is_api_error() {
        let body = json!({"choices": []});
        let err = parse(body.clone()).unwrap_err();
        assert!(matches!(&err, MagicError::Api { message, .. } if *message == body.to_string()));
        assert_eq!(err.raw_json(), Some(&body));
    }

    #[test]
    fn blank_content_is_api_error() {
        for content in [json!("   \n"), json!(null)] {
            let err = parse(json!({
                "choices": [{"message": {"content": content}}]
            }))
            .unwrap_err();
            assert!(matches!(err, MagicError::Api { .. }));
        }
    }

    #[test]
    fn error_message_fallback_order() {
        let body = json!({});
        assert_eq!(
            error_message(Some(&json!({"message": "m", "code": "c", "status": "s"})), &body),
            "m"
        );
        assert_eq!(error_message(Some(&json!({"message": "", "code": "c"})), &body), "c");
        assert_eq!(error_message(Some(&json!({"code": 0, "status": 503})), &body), "503");
        assert_eq!(
            error_message(Some(&json!({"type": "oops"})), &body),
            r#"{"type":"oops"}"#
        );
        assert_eq!(error_message(None, &json!({"choices": []})), r#"{"choices":[]}"#);
    }

    #[test]
    fn sources_are_unique_hosts_without_www() {
        let completion = Completion {
            text: "ls".to_string(),
            total_tokens: None,
            citations: vec![
                "https://www.example.com/a".to_string(),
                "https://example.com/b".to_string(),
                "https://docs.rs/reqwest".to_string(),
                "https://wwwhat.org/".to_string(),
                "not a url".to_string(),
            ],
            raw: Value::Null,
        };
        assert_eq!(completion.sources(), vec!["example.com", "docs.rs", "wwwhat.org"]);
    }

    #[test]
    fn model_descriptor_accepts_string_prices() {
        let model: ModelDescriptor = serde_json::from_value(json!({
            "id": "vendor/model",
            "name": "Model",
            "created": 1700000000,
            "context_length": 128000,
            "architecture": {
                "input_modalities": ["text", "image"],
                "output_modalities": ["text"]
            },
            "pricing": {"prompt": "0.000002", "completion": "0.000008"}
        }))
        .unwrap();
        assert_eq!(model.context_length, 128_000);
        assert_eq!(model.pricing.prompt, 0.000002);
        assert_eq!(model.pricing.completion, 0.000008);
    }

    #[test]
    fn model_descriptor_tolerates_missing_fields() {
        let model: ModelDescriptor = serde_json::from_value(json!({
            "id": "openrouter/auto",
            "context_length": null,
            "pricing": {"prompt": "-1"}
        }))
        .unwrap();
        assert_eq!(model.context_length, 0);
        assert_eq!(model.pricing.prompt, -1.0);
        assert!(model.pricing.completion.is_nan());
        assert!(model.architecture.input_modalities.is_empty());
    }

    #[test]
    fn model_descriptor_treats_null_objects_as_unknown() {
        let model: ModelDescriptor = serde_json::from_value(json!({
            "id": "vendor/bare",
            "name": null,
            "architecture": null,
            "pricing": null
        }))
        .unwrap();
        assert_eq!(model.name, "");
        assert!(model.architecture.output_modalities.is_empty());
        assert!(model.pricing.prompt.is_nan());
        assert!(model.pricing.completion.is_nan());

        let arch: Architecture =
            serde_json::from_value(json!({"input_modalities": null, "output_modalities": ["text"]}))
                .unwrap();
        assert!(arch.input_modalities.is_empty());
    }

    #[test]
    fn ask_request_serializes_two_messages() {
        let request = CompletionRequest::ask("m", "sys", "list files");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "list files"}
                ]
            })
        );
    }
}
