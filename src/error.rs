use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while serving a single query or lookup.
///
/// Every variant is scoped to the request that triggered it: a failing query
/// never affects its siblings in a batch.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Missing or malformed data source credentials
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed query fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or API failure reported by the cloud provider
    #[error("Provider error: {action}: {message}")]
    Provider { action: String, message: String },

    /// Failure while encoding or decoding a JSON body
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        BridgeError::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        BridgeError::Validation(message.into())
    }

    pub fn provider(action: &str, message: impl std::fmt::Display) -> Self {
        BridgeError::Provider {
            action: action.to_string(),
            message: message.to_string(),
        }
    }

    /// Status reported to the host alongside a failed query.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
