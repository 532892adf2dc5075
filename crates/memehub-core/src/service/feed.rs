//! Public feeds: global recency/popularity, free-text search, tag filter.

use std::sync::Arc;

use uuid::Uuid;

use memehub_shared::dto::FeedPage;

use crate::error::ApiError;
use crate::feed::{FeedSort, PageRequest};
use crate::ports::MemeRepository;

pub struct FeedService {
    memes: Arc<dyn MemeRepository>,
}

impl FeedService {
    pub fn new(memes: Arc<dyn MemeRepository>) -> Self {
        Self { memes }
    }

    pub async fn page(
        &self,
        sort: FeedSort,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage, ApiError> {
        let memes = match sort {
            FeedSort::Recent => self.memes.recent(page.window()).await?,
            FeedSort::Popular => self.memes.popular(page.window()).await?,
        };
        Ok(page.compose(memes, viewer))
    }

    pub async fn search(
        &self,
        query: &str,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::missing_parameter("Search query"));
        }
        let memes = self.memes.search(query, page.window()).await?;
        Ok(page.compose(memes, viewer))
    }

    pub async fn by_tag(
        &self,
        tag: &str,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage, ApiError> {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return Err(ApiError::missing_parameter("Tag"));
        }
        let memes = self.memes.with_tags(&[tag], page.window()).await?;
        Ok(page.compose(memes, viewer))
    }
}
