//! Standard response envelopes.
//!
//! Every failure on the wire is `{error, message}` where `error` is a stable
//! machine-readable code; mutation acknowledgements are `{success, message}`.

use serde::{Deserialize, Serialize};

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code, e.g. `validation_error`, `user_exists`.
    pub error: String,
    /// Human-readable explanation. Never contains internal detail.
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Acknowledgement body for mutations that return no resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
