//! Feed composition: page clamping, the fetch-one-extra window, and
//! response shaping.

use uuid::Uuid;

use memehub_shared::dto::FeedPage;

use crate::domain::Meme;
use crate::ports::PageWindow;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Feed ordering. Popularity is like-set cardinality descending with
/// recency as tiebreak - monotonic and stable for unchanged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSort {
    Recent,
    Popular,
}

impl FeedSort {
    /// Parse the `sort` query value; anything but `popular` is recency.
    pub fn parse(value: &str) -> Self {
        match value {
            "popular" => Self::Popular,
            _ => Self::Recent,
        }
    }
}

/// A clamped pagination request: `page >= 1`, `limit` in `[1, 50]`,
/// default 20.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The store window: one row beyond the page size, skipping the
    /// preceding pages. The extra row answers `has_more` without a count
    /// query.
    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: u64::from(self.limit) + 1,
            skip: u64::from(self.page - 1) * u64::from(self.limit),
        }
    }

    /// Turn fetched rows into a page. If the extra row came back it is
    /// dropped before shaping and the cursor points at the next page.
    pub fn compose(&self, mut memes: Vec<Meme>, viewer: Option<Uuid>) -> FeedPage {
        let has_more = memes.len() > self.limit as usize;
        if has_more {
            memes.truncate(self.limit as usize);
        }

        FeedPage {
            memes: memes.iter().map(|m| m.to_response(viewer)).collect(),
            has_more,
            next_cursor: has_more.then(|| (self.page + 1).to_string()),
        }
    }
}
