use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use memehub_shared::dto::UserResponse;

/// User entity - an account in the system.
///
/// `total_likes` is a denormalized sum of likes received across the user's
/// active memes; it only moves through like/unlike transitions and is
/// clamped at zero by the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image: Option<String>,
    pub total_likes: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl User {
    /// Create a new active user with a generated ID and timestamp.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            profile_image: None,
            total_likes: 0,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    /// Shape the public profile. The password hash never leaves this type.
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id.to_string(),
            username: self.username.clone(),
            email: self.email.clone(),
            profile_image: self.profile_image.clone(),
            total_likes: self.total_likes,
            created_at: self.created_at.timestamp(),
        }
    }
}
