//! In-memory repositories - the `minimal` configuration and the test
//! backing store.
//!
//! A shared `MemoryStore` of async-RwLock HashMaps stands in for the
//! external document store. Conditional updates run under the write lock,
//! which gives the same exactly-once-effect guarantee the Postgres
//! adapter gets from conditional UPDATEs. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use memehub_core::domain::{Meme, User};
use memehub_core::error::RepoError;
use memehub_core::ports::{MemeRepository, PageWindow, UserRepository};

/// The shared backing store.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    memes: RwLock<HashMap<Uuid, Meme>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn apply_window(memes: Vec<Meme>, window: PageWindow) -> Vec<Meme> {
    memes
        .into_iter()
        .skip(window.skip as usize)
        .take(window.limit as usize)
        .collect()
}

/// Newest first, id as tiebreak so equal timestamps cannot flap.
fn sort_recent(memes: &mut [Meme]) {
    memes.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
}

/// Like-set cardinality first, then recency.
fn sort_popular(memes: &mut [Meme]) {
    memes.sort_by(|a, b| {
        (b.likes.len(), b.created_at, b.id).cmp(&(a.likes.len(), a.created_at, a.id))
    });
}

pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;

        // Uniqueness spans soft-deleted rows, matching the store-level
        // unique indexes: a retired identity is never reusable.
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(RepoError::Constraint(
                "username or email already exists".to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users.get(&id).filter(|u| u.is_active).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users
            .values()
            .find(|u| u.is_active && u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users
            .values()
            .find(|u| u.is_active && u.email == email)
            .cloned())
    }

    async fn find_by_username_or_email(&self, handle: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users
            .values()
            .find(|u| u.is_active && (u.username == handle || u.email == handle))
            .cloned())
    }

    async fn adjust_total_likes(&self, id: Uuid, delta: i64) -> Result<bool, RepoError> {
        let mut users = self.store.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.total_likes = (user.total_likes + delta).max(0);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_total_likes(&self, id: Uuid, value: i64) -> Result<bool, RepoError> {
        let mut users = self.store.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.total_likes = value.max(0);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_profile_image(
        &self,
        id: Uuid,
        image_url: Option<String>,
    ) -> Result<bool, RepoError> {
        let mut users = self.store.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.profile_image = image_url;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct InMemoryMemeRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryMemeRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    async fn collect_sorted<F>(&self, keep: F) -> Vec<Meme>
    where
        F: Fn(&Meme) -> bool,
    {
        let memes = self.store.memes.read().await;
        let mut hits: Vec<Meme> = memes
            .values()
            .filter(|m| m.is_active && keep(m))
            .cloned()
            .collect();
        sort_recent(&mut hits);
        hits
    }
}

#[async_trait]
impl MemeRepository for InMemoryMemeRepository {
    async fn create(&self, meme: Meme) -> Result<Meme, RepoError> {
        let mut memes = self.store.memes.write().await;
        memes.insert(meme.id, meme.clone());
        Ok(meme)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meme>, RepoError> {
        let memes = self.store.memes.read().await;
        Ok(memes.get(&id).filter(|m| m.is_active).cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        window: PageWindow,
    ) -> Result<Vec<Meme>, RepoError> {
        let hits = self.collect_sorted(|m| m.owner_id == owner_id).await;
        Ok(apply_window(hits, window))
    }

    async fn recent(&self, window: PageWindow) -> Result<Vec<Meme>, RepoError> {
        let hits = self.collect_sorted(|_| true).await;
        Ok(apply_window(hits, window))
    }

    async fn popular(&self, window: PageWindow) -> Result<Vec<Meme>, RepoError> {
        let memes = self.store.memes.read().await;
        let mut hits: Vec<Meme> = memes.values().filter(|m| m.is_active).cloned().collect();
        drop(memes);
        sort_popular(&mut hits);
        Ok(apply_window(hits, window))
    }

    async fn search(&self, query: &str, window: PageWindow) -> Result<Vec<Meme>, RepoError> {
        let needle = query.to_lowercase();
        let hits = self
            .collect_sorted(|m| {
                m.caption
                    .as_ref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .await;
        Ok(apply_window(hits, window))
    }

    async fn with_tags(
        &self,
        tags: &[String],
        window: PageWindow,
    ) -> Result<Vec<Meme>, RepoError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        let hits = self
            .collect_sorted(|m| m.tags.iter().any(|t| tags.contains(t)))
            .await;
        Ok(apply_window(hits, window))
    }

    async fn like(&self, meme_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut memes = self.store.memes.write().await;
        match memes.get_mut(&meme_id) {
            Some(meme) if meme.is_active && !meme.likes.contains(&user_id) => {
                meme.likes.push(user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn unlike(&self, meme_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut memes = self.store.memes.write().await;
        match memes.get_mut(&meme_id) {
            Some(meme) if meme.is_active => {
                let before = meme.likes.len();
                meme.likes.retain(|id| *id != user_id);
                Ok(meme.likes.len() < before)
            }
            _ => Ok(false),
        }
    }

    async fn increment_downloads(&self, meme_id: Uuid) -> Result<bool, RepoError> {
        let mut memes = self.store.memes.write().await;
        match memes.get_mut(&meme_id) {
            Some(meme) if meme.is_active => {
                meme.download_count += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update(
        &self,
        meme_id: Uuid,
        owner_id: Uuid,
        caption: Option<String>,
        tags: Vec<String>,
    ) -> Result<bool, RepoError> {
        let mut memes = self.store.memes.write().await;
        match memes.get_mut(&meme_id) {
            Some(meme) if meme.is_active && meme.owner_id == owner_id => {
                if let Some(caption) = caption {
                    meme.caption = Some(caption);
                }
                meme.tags = tags;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn soft_delete(&self, meme_id: Uuid, owner_id: Uuid) -> Result<bool, RepoError> {
        let mut memes = self.store.memes.write().await;
        match memes.get_mut(&meme_id) {
            Some(meme) if meme.is_active && meme.owner_id == owner_id => {
                meme.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, RepoError> {
        let memes = self.store.memes.read().await;
        Ok(memes
            .values()
            .filter(|m| m.is_active && m.owner_id == owner_id)
            .count() as u64)
    }

    async fn likes_received(&self, owner_id: Uuid) -> Result<i64, RepoError> {
        let memes = self.store.memes.read().await;
        Ok(memes
            .values()
            .filter(|m| m.is_active && m.owner_id == owner_id)
            .map(|m| m.likes.len() as i64)
            .sum())
    }
}
