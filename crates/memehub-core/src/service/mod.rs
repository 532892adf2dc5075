//! Transport-free use cases behind the HTTP contract. The API surface
//! authenticates a caller, picks the operation, and serializes the result;
//! everything in between happens here.

mod auth;
mod feed;
mod memes;
mod users;

pub use auth::AuthService;
pub use feed::FeedService;
pub use memes::MemeService;
pub use users::UserService;

use uuid::Uuid;

/// Identity strings arrive from the outside world; one that does not parse
/// into a store id is a recoverable not-found, never a crash.
pub(crate) fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}
