//! Credential service ports.

use uuid::Uuid;

/// The authenticated identity derived from a verified token.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
}

/// Signed, time-bounded session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a signed token carrying the user's id and username.
    fn issue_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Check signature, issuer, audience, and expiry; return the principal.
    fn verify_token(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Slow adaptive password hashing.
pub trait PasswordService: Send + Sync {
    /// One-way, salted hash. The same plaintext yields a different hash on
    /// every call.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash. A malformed hash is a
    /// mismatch, never an error.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Credential service errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("hashing error: {0}")]
    Hashing(String),
}
