//! # Payment Error Types
//!
//! Typed error handling for invoice creation and callback verification.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected before any gateway call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Gateway answered with a non-200 status, or the transport itself failed
    #[error("Payment request error: {0}")]
    RequestError(String),

    /// Recomputed signature does not match the received one
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// Callback payload is incomplete or could not be authenticated
    #[error("Invalid callback data")]
    InvalidCallbackData,

    /// Gateway accepted the request but no checkout URL could be extracted
    #[error("Payment URL was not received")]
    PaymentUrlNotReceived,

    /// Malformed base64 or JSON in a callback body
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl PaymentError {
    /// Returns true if this error came out of callback verification
    pub fn is_callback_rejection(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidSignature
                | PaymentError::InvalidCallbackData
                | PaymentError::ParseError(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::RequestError(_) => 502,
            PaymentError::InvalidSignature => 401,
            PaymentError::InvalidCallbackData => 400,
            PaymentError::PaymentUrlNotReceived => 502,
            PaymentError::ParseError(_) => 400,
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::ParseError(err.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
