//! Registration, login, and token verification.

use std::sync::Arc;

use memehub_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::domain::User;
use crate::ports::{PasswordService, Principal, TokenService, UserRepository};
use crate::validate;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account and log it in. Validation precedes the
    /// duplicate checks, which precede any write.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, ApiError> {
        let username = req.username.trim().to_owned();
        let email = req.email.trim().to_lowercase();

        if !validate::is_valid_username(&username) {
            return Err(ApiError::validation("Invalid username format"));
        }
        if !validate::is_valid_email(&email) {
            return Err(ApiError::validation("Invalid email format"));
        }
        if !validate::is_valid_password(&req.password) {
            return Err(ApiError::validation(
                "Password must be at least 6 characters",
            ));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(ApiError::user_exists("Username already taken"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::user_exists("Email already registered"));
        }

        let password_hash = self
            .passwords
            .hash(&req.password)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        // The store's uniqueness constraint backstops the pre-checks if a
        // concurrent registration slips between them.
        let user = self
            .users
            .create(User::new(username, email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");

        let token = self
            .tokens
            .issue_token(user.id, &user.username)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(AuthResponse {
            token,
            user: user.to_response(),
        })
    }

    /// Log in with a username or email. Unknown handle and wrong password
    /// are indistinguishable.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = self.users.find_by_username_or_email(&req.username).await?;

        let user = match user {
            Some(user) if self.passwords.verify(&req.password, &user.password_hash) => user,
            _ => return Err(ApiError::invalid_credentials()),
        };

        let token = self
            .tokens
            .issue_token(user.id, &user.username)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(AuthResponse {
            token,
            user: user.to_response(),
        })
    }

    /// Resolve a bearer token into a principal.
    pub fn authenticate(&self, token: &str) -> Result<Principal, ApiError> {
        self.tokens
            .verify_token(token)
            .map_err(|_| ApiError::unauthorized())
    }
}
