/*
[INPUT]:  Error sources (HTTP, service envelopes, serialization, URLs)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the RentRoll adapter
#[derive(Error, Debug)]
pub enum RentrollError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Service answered `{"status":"error"}`; a business rule rejected the call
    #[error("{message}")]
    Server { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RentrollError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            RentrollError::Http(err) => err.is_timeout() || err.is_connect(),
            RentrollError::Api { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// True for rejections reported inside a well-formed service reply
    pub fn is_business_error(&self) -> bool {
        matches!(self, RentrollError::Server { .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        RentrollError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        RentrollError::Server {
            message: message.into(),
        }
    }
}

/// Result type alias for RentRoll operations
pub type Result<T> = std::result::Result<T, RentrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let server_err = RentrollError::api_error(StatusCode::BAD_GATEWAY, "upstream");
        assert!(server_err.is_retryable());

        let business_err = RentrollError::server("Expense already reversed");
        assert!(!business_err.is_retryable());
    }

    #[test]
    fn test_business_error_display() {
        let err = RentrollError::server("Account rule is closed");
        assert!(err.is_business_error());
        assert_eq!(err.to_string(), "Account rule is closed");
    }

    #[test]
    fn test_api_error_creation() {
        let err = RentrollError::api_error(StatusCode::BAD_REQUEST, "bad BID");
        match err {
            RentrollError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "bad BID");
            }
            _ => panic!("Expected Api error variant"),
        }
    }
}
