//! Error types for the OpenAI client
//!
//! This module defines the error type returned by every fallible client call.

use serde::Deserialize;
use thiserror::Error;

/// Client-level errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        error_type: Option<String>,
        code: Option<String>,
    },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Build an API error from a status code and the raw response body.
    ///
    /// Uses the service's `{"error": {...}}` payload when the body has one and
    /// falls back to the raw text otherwise.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(response) => response.error.into_client_error(status),
            Err(_) => ClientError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
                error_type: None,
                code: None,
            },
        }
    }

    /// HTTP status carried by the error, if it came from the service
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error payload returned by the service
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Error details
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    /// Some endpoints send a number here
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn into_client_error(self, status: u16) -> ClientError {
        ClientError::Api {
            status,
            message: self.message.unwrap_or_else(|| format!("HTTP {}", status)),
            error_type: self.error_type,
            code: self.code.map(|code| match code {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
        }
    }
}

/// Result type alias for convenience
pub type ClientResult<T> = Result<T, ClientError>;
