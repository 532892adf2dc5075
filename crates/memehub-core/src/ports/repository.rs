//! Persistence ports for the User and Meme entities.
//!
//! Contracts every backing store must honor: reads implicitly filter out
//! soft-deleted records, windowed queries order newest-first with a stable
//! tiebreak, and the boolean mutations are single atomic conditional
//! updates whose return value is "did a change occur".

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Meme, User};
use crate::error::RepoError;

/// A `(limit, skip)` window as handed to the store. The feed composer
/// requests one row beyond the page size to detect whether more exist.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub limit: u64,
    pub skip: u64,
}

/// User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Username and email are unique; a duplicate is a
    /// `RepoError::Constraint`, never a silent overwrite.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Login lookup: the handle may be a username or an email.
    async fn find_by_username_or_email(&self, handle: &str) -> Result<Option<User>, RepoError>;

    /// Atomically add `delta` to the denormalized like total, clamped at
    /// zero. Returns whether the user existed.
    async fn adjust_total_likes(&self, id: Uuid, delta: i64) -> Result<bool, RepoError>;

    /// Overwrite the denormalized like total - the reconciliation path.
    async fn set_total_likes(&self, id: Uuid, value: i64) -> Result<bool, RepoError>;

    async fn set_profile_image(
        &self,
        id: Uuid,
        image_url: Option<String>,
    ) -> Result<bool, RepoError>;
}

/// Meme persistence. All mutations require the target to be active;
/// ownership-checked mutations additionally require `owner_id` to match.
#[async_trait]
pub trait MemeRepository: Send + Sync {
    async fn create(&self, meme: Meme) -> Result<Meme, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meme>, RepoError>;

    async fn find_by_owner(&self, owner_id: Uuid, window: PageWindow)
    -> Result<Vec<Meme>, RepoError>;

    /// Global feed, newest first.
    async fn recent(&self, window: PageWindow) -> Result<Vec<Meme>, RepoError>;

    /// Global feed ordered by like-set cardinality, newest first among ties.
    async fn popular(&self, window: PageWindow) -> Result<Vec<Meme>, RepoError>;

    /// Case-insensitive caption substring search.
    async fn search(&self, query: &str, window: PageWindow) -> Result<Vec<Meme>, RepoError>;

    /// Memes carrying any of the given (already normalized) tags.
    async fn with_tags(&self, tags: &[String], window: PageWindow)
    -> Result<Vec<Meme>, RepoError>;

    /// Add `user_id` to the like set only if absent - one atomic
    /// conditional update. Returns whether a change occurred.
    async fn like(&self, meme_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    /// Remove `user_id` from the like set if present.
    async fn unlike(&self, meme_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    /// Unconditional atomic +1. No ownership check - downloads are public.
    async fn increment_downloads(&self, meme_id: Uuid) -> Result<bool, RepoError>;

    /// Ownership-checked edit: tags are overwritten unconditionally, the
    /// caption only when provided.
    async fn update(
        &self,
        meme_id: Uuid,
        owner_id: Uuid,
        caption: Option<String>,
        tags: Vec<String>,
    ) -> Result<bool, RepoError>;

    /// Ownership-checked soft delete. Does not touch other users' like
    /// history.
    async fn soft_delete(&self, meme_id: Uuid, owner_id: Uuid) -> Result<bool, RepoError>;

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, RepoError>;

    /// Sum of like-set sizes across the owner's active memes. Backs
    /// reconciliation of the denormalized `total_likes`.
    async fn likes_received(&self, owner_id: Uuid) -> Result<i64, RepoError>;
}
