use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use memehub_shared::dto::MemeResponse;

/// Meme entity - a posted image with caption, tags, and like state.
///
/// `owner_username` is a denormalized snapshot taken at creation time and
/// may drift from the owner's current username. `likes` carries set
/// semantics: each user id appears at most once, enforced by the
/// repository's conditional update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meme {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<Uuid>,
    pub download_count: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Meme {
    /// Create a new active meme with a generated ID and timestamp.
    /// Tags are expected to be normalized by the caller.
    pub fn new(
        owner_id: Uuid,
        owner_username: String,
        image_url: String,
        caption: Option<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            owner_username,
            image_url,
            caption,
            tags,
            likes: Vec::new(),
            download_count: 0,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    /// Whether `user_id` is a member of the like set.
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Shape for a response. `likes_count` and `is_liked` are derived here,
    /// never stored.
    pub fn to_response(&self, viewer: Option<Uuid>) -> MemeResponse {
        MemeResponse {
            id: self.id.to_string(),
            user_id: self.owner_id.to_string(),
            username: self.owner_username.clone(),
            image_url: self.image_url.clone(),
            caption: self.caption.clone(),
            tags: self.tags.clone(),
            likes_count: self.likes.len() as u64,
            is_liked: viewer.map(|v| self.is_liked_by(v)).unwrap_or(false),
            download_count: self.download_count,
            created_at: self.created_at.timestamp(),
        }
    }
}

/// Normalize a tag list: trim, lowercase, drop empties, keep the first
/// occurrence of each tag.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
