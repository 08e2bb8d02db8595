use serde_json::Value;
use std::io;
use thiserror::Error;

/// Unified error type for Magic Command
#[derive(Error, Debug)]
pub enum MagicError {
    /// Missing credentials or an unreadable configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failures (DNS, refused connection, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be parsed as the expected JSON
    #[error("Malformed response ({status} {reason}): {detail}")]
    MalformedResponse {
        status: u16,
        reason: String,
        detail: String,
        body: Option<String>,
    },

    /// Well-formed response describing a provider-side failure or an empty completion
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The parsed reply the message was extracted from
        raw: Value,
    },

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl MagicError {
    /// An API error that keeps the reply it came from, for verbose output.
    pub fn api(message: impl Into<String>, raw: Value) -> Self {
        MagicError::Api {
            message: message.into(),
            raw,
        }
    }

    /// Raw body attached to the error, if any. Only shown in verbose mode.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            MagicError::MalformedResponse { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Parsed reply attached to an API error, if any. Only shown in verbose mode.
    pub fn raw_json(&self) -> Option<&Value> {
        match self {
            MagicError::Api { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MagicError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MagicError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            MagicError::Network(format!("Connection failed: {}", err))
        } else {
            MagicError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<rustyline::error::ReadlineError> for MagicError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        MagicError::Input(err.to_string())
    }
}
