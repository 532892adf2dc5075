//! Meme lifecycle: create, read, edit, soft delete, like/unlike, download.

use std::sync::Arc;

use uuid::Uuid;

use memehub_shared::SuccessResponse;
use memehub_shared::dto::{CreateMemeRequest, MemeResponse, UpdateMemeRequest};

use crate::domain::{Meme, normalize_tags};
use crate::error::ApiError;
use crate::ports::{MemeRepository, Principal, UserRepository};
use crate::service::parse_id;
use crate::validate;

const NOT_OWNED_MESSAGE: &str = "Meme not found or you don't have permission";

pub struct MemeService {
    memes: Arc<dyn MemeRepository>,
    users: Arc<dyn UserRepository>,
}

impl MemeService {
    pub fn new(memes: Arc<dyn MemeRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { memes, users }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        req: CreateMemeRequest,
    ) -> Result<MemeResponse, ApiError> {
        if !validate::is_valid_image_url(&req.image_url) {
            return Err(ApiError::invalid_image());
        }

        let meme = Meme::new(
            principal.user_id,
            principal.username.clone(),
            req.image_url,
            req.caption.map(|c| c.trim().to_owned()),
            normalize_tags(req.tags),
        );

        let meme = self.memes.create(meme).await?;
        tracing::info!(meme_id = %meme.id, owner = %meme.owner_username, "meme created");

        Ok(meme.to_response(Some(principal.user_id)))
    }

    pub async fn get(&self, meme_id: &str, viewer: Option<Uuid>) -> Result<MemeResponse, ApiError> {
        let Some(id) = parse_id(meme_id) else {
            return Err(ApiError::meme_not_found());
        };
        match self.memes.find_by_id(id).await? {
            Some(meme) => Ok(meme.to_response(viewer)),
            None => Err(ApiError::meme_not_found()),
        }
    }

    /// Edit an owned meme. A missing, deleted, or foreign meme all answer
    /// the same not-found.
    pub async fn update(
        &self,
        principal: &Principal,
        meme_id: &str,
        req: UpdateMemeRequest,
    ) -> Result<SuccessResponse, ApiError> {
        let Some(id) = parse_id(meme_id) else {
            return Err(ApiError::not_found("meme_not_found", NOT_OWNED_MESSAGE));
        };

        let updated = self
            .memes
            .update(
                id,
                principal.user_id,
                req.caption.map(|c| c.trim().to_owned()),
                normalize_tags(req.tags),
            )
            .await?;

        if updated {
            Ok(SuccessResponse::new("Meme updated successfully"))
        } else {
            Err(ApiError::not_found("meme_not_found", NOT_OWNED_MESSAGE))
        }
    }

    pub async fn delete(
        &self,
        principal: &Principal,
        meme_id: &str,
    ) -> Result<SuccessResponse, ApiError> {
        let Some(id) = parse_id(meme_id) else {
            return Err(ApiError::not_found("meme_not_found", NOT_OWNED_MESSAGE));
        };

        if self.memes.soft_delete(id, principal.user_id).await? {
            tracing::info!(meme_id = %id, "meme soft-deleted");
            Ok(SuccessResponse::new("Meme deleted successfully"))
        } else {
            Err(ApiError::not_found("meme_not_found", NOT_OWNED_MESSAGE))
        }
    }

    /// Like a meme. Membership is one conditional update in the store; the
    /// owner's denormalized total is a second, non-transactional step.
    pub async fn like(
        &self,
        principal: &Principal,
        meme_id: &str,
    ) -> Result<SuccessResponse, ApiError> {
        let Some(id) = parse_id(meme_id) else {
            return Err(ApiError::already_liked());
        };

        if !self.memes.like(id, principal.user_id).await? {
            return Err(ApiError::already_liked());
        }

        self.bump_owner_total(id, 1).await;
        Ok(SuccessResponse::new("Meme liked"))
    }

    pub async fn unlike(
        &self,
        principal: &Principal,
        meme_id: &str,
    ) -> Result<SuccessResponse, ApiError> {
        let Some(id) = parse_id(meme_id) else {
            return Err(ApiError::not_liked());
        };

        if !self.memes.unlike(id, principal.user_id).await? {
            return Err(ApiError::not_liked());
        }

        self.bump_owner_total(id, -1).await;
        Ok(SuccessResponse::new("Meme unliked"))
    }

    /// Count a download. Public - no principal involved.
    pub async fn record_download(&self, meme_id: &str) -> Result<SuccessResponse, ApiError> {
        let Some(id) = parse_id(meme_id) else {
            return Err(ApiError::meme_not_found());
        };

        if self.memes.increment_downloads(id).await? {
            Ok(SuccessResponse::new("Download counted"))
        } else {
            Err(ApiError::meme_not_found())
        }
    }

    /// Second step of a like/unlike: adjust the owner's total. The
    /// membership change already committed, so a failure here leaves the
    /// counter eventually consistent - reported, not swallowed, and
    /// repairable via `UserService::reconcile_total_likes`.
    async fn bump_owner_total(&self, meme_id: Uuid, delta: i64) {
        let owner_id = match self.memes.find_by_id(meme_id).await {
            Ok(Some(meme)) => meme.owner_id,
            Ok(None) => {
                tracing::warn!(%meme_id, delta, "like recorded but meme vanished before counter update");
                return;
            }
            Err(e) => {
                tracing::warn!(%meme_id, delta, error = %e, "like recorded but owner lookup failed");
                return;
            }
        };

        match self.users.adjust_total_likes(owner_id, delta).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(%meme_id, %owner_id, delta, "like recorded but owner missing for counter update");
            }
            Err(e) => {
                tracing::warn!(%meme_id, %owner_id, delta, error = %e, "like recorded but counter update failed");
            }
        }
    }
}
