//! SeaORM entities and their domain conversions.

pub mod meme;
pub mod user;
