//! Error taxonomy.
//!
//! `ApiError` is the service-level classification with stable wire codes and
//! a status mapping; `RepoError` is what repository implementations report
//! at the store boundary. Raw store errors never cross the service layer.

use thiserror::Error;

use memehub_shared::ErrorBody;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("constraint violation: {0}")]
    Constraint(String),
}

/// Service-level errors, one variant per taxonomy class.
///
/// Absent and not-owned resources are both `NotFound` so ownership is never
/// leaked through the error channel.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    #[error("{message}")]
    Auth { code: &'static str, message: String },

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: "validation_error",
            message: message.into(),
        }
    }

    pub fn invalid_image() -> Self {
        Self::Validation {
            code: "invalid_image",
            message: "Invalid image URL".into(),
        }
    }

    pub fn missing_parameter(what: &str) -> Self {
        Self::Validation {
            code: "missing_parameter",
            message: format!("{what} is required"),
        }
    }

    pub fn already_liked() -> Self {
        Self::Validation {
            code: "already_liked",
            message: "Meme already liked or not found".into(),
        }
    }

    pub fn not_liked() -> Self {
        Self::Validation {
            code: "not_liked",
            message: "Meme not liked or not found".into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::Auth {
            code: "invalid_credentials",
            message: "Invalid username/email or password".into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Auth {
            code: "unauthorized",
            message: "Token is not valid or has expired".into(),
        }
    }

    pub fn user_exists(message: impl Into<String>) -> Self {
        Self::Conflict {
            code: "user_exists",
            message: message.into(),
        }
    }

    pub fn user_not_found() -> Self {
        Self::NotFound {
            code: "user_not_found",
            message: "User not found".into(),
        }
    }

    pub fn meme_not_found() -> Self {
        Self::NotFound {
            code: "meme_not_found",
            message: "Meme not found".into(),
        }
    }

    /// Not-found with a custom message, e.g. the ownership-neutral
    /// "not found or you don't have permission" wording.
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    /// Stable machine-readable wire code.
    pub fn code(&self) -> &str {
        match self {
            Self::Validation { code, .. }
            | Self::Auth { code, .. }
            | Self::NotFound { code, .. }
            | Self::Conflict { code, .. } => code,
            Self::Unavailable(_) => "service_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status the API surface should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Auth { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Unavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Wire body. Internal and storage failures get a generic message;
    /// the detail stays in the logs.
    pub fn body(&self) -> ErrorBody {
        let message = match self {
            Self::Unavailable(detail) => {
                tracing::error!(%detail, "storage unavailable");
                "Storage temporarily unavailable".to_string()
            }
            Self::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };
        ErrorBody::new(self.code(), message)
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) | RepoError::Query(msg) => Self::Unavailable(msg),
            // The only unique constraints in the schema are username/email.
            RepoError::Constraint(msg) => Self::user_exists(msg),
        }
    }
}
