//! Data Transfer Objects - request and response types for the API.
//!
//! Field names serialize in camelCase to match the public wire format.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login. `username` may also carry an email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request to post a new meme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemeRequest {
    pub image_url: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to edit an owned meme. Tags are always replaced wholesale;
/// the caption only when provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemeRequest {
    pub caption: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A user's public profile. The password hash is never part of this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub total_likes: i64,
    /// Epoch seconds.
    pub created_at: i64,
}

/// A meme shaped for a response, with like metadata derived for the
/// requesting viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemeResponse {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub likes_count: u64,
    pub is_liked: bool,
    pub download_count: i64,
    /// Epoch seconds.
    pub created_at: i64,
}

/// Successful registration or login: a bearer token plus the user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// One page of a feed, with the fetch-one-extra pagination verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub memes: Vec<MemeResponse>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meme_response_uses_camel_case_wire_names() {
        let meme = MemeResponse {
            id: "m1".into(),
            user_id: "u1".into(),
            username: "alice".into(),
            image_url: "https://res.cloudinary.com/x/a.jpg".into(),
            caption: None,
            tags: vec!["fun".into()],
            likes_count: 2,
            is_liked: true,
            download_count: 0,
            created_at: 1700000000,
        };

        let json = serde_json::to_string(&meme).unwrap();
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"likesCount\""));
        assert!(json.contains("\"isLiked\""));
        assert!(json.contains("\"downloadCount\""));
    }

    #[test]
    fn create_request_tags_default_to_empty() {
        let req: CreateMemeRequest =
            serde_json::from_str(r#"{"imageUrl":"https://res.cloudinary.com/x/a.png"}"#).unwrap();
        assert!(req.tags.is_empty());
        assert!(req.caption.is_none());
    }
}
