//! Domain entities.

mod meme;
mod user;

pub use meme::{Meme, normalize_tags};
pub use user::User;
