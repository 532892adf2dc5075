//! Profile reads, the per-user meme feed, and counter reconciliation.

use std::sync::Arc;

use uuid::Uuid;

use memehub_shared::SuccessResponse;
use memehub_shared::dto::{FeedPage, UserResponse};

use crate::error::ApiError;
use crate::feed::PageRequest;
use crate::ports::{MemeRepository, Principal, UserRepository};
use crate::service::parse_id;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    memes: Arc<dyn MemeRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, memes: Arc<dyn MemeRepository>) -> Self {
        Self { users, memes }
    }

    /// The authenticated caller's own profile.
    pub async fn me(&self, principal: &Principal) -> Result<UserResponse, ApiError> {
        match self.users.find_by_id(principal.user_id).await? {
            Some(user) => Ok(user.to_response()),
            None => Err(ApiError::user_not_found()),
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<UserResponse, ApiError> {
        let Some(id) = parse_id(user_id) else {
            return Err(ApiError::user_not_found());
        };
        match self.users.find_by_id(id).await? {
            Some(user) => Ok(user.to_response()),
            None => Err(ApiError::user_not_found()),
        }
    }

    /// A user's memes, newest first. A malformed id yields an empty page.
    pub async fn memes_of(
        &self,
        user_id: &str,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage, ApiError> {
        let memes = match parse_id(user_id) {
            Some(id) => self.memes.find_by_owner(id, page.window()).await?,
            None => Vec::new(),
        };
        Ok(page.compose(memes, viewer))
    }

    pub async fn set_profile_image(
        &self,
        principal: &Principal,
        image_url: Option<String>,
    ) -> Result<SuccessResponse, ApiError> {
        if self
            .users
            .set_profile_image(principal.user_id, image_url)
            .await?
        {
            Ok(SuccessResponse::new("Profile updated"))
        } else {
            Err(ApiError::user_not_found())
        }
    }

    /// Recompute the denormalized like total from the like sets and write
    /// it back. This is the audit path for the documented gap between the
    /// membership write and the counter write.
    pub async fn reconcile_total_likes(&self, user_id: Uuid) -> Result<i64, ApiError> {
        let actual = self.memes.likes_received(user_id).await?;
        if !self.users.set_total_likes(user_id, actual).await? {
            return Err(ApiError::user_not_found());
        }
        tracing::info!(%user_id, total_likes = actual, "reconciled like total");
        Ok(actual)
    }
}
