//! # Memehub Core
//!
//! The domain layer of the Memehub backend: entities, validation, the error
//! taxonomy, the persistence/credential ports, the feed composer, and the
//! transport-free service layer behind the HTTP contract. Pure business
//! logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod feed;
pub mod ports;
pub mod service;
pub mod validate;

pub use error::ApiError;
