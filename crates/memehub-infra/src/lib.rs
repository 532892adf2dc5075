//! # Memehub Infrastructure
//!
//! Concrete implementations of the ports defined in `memehub-core`:
//! credential services, repositories, and telemetry bootstrap.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory repositories only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 credential services

pub mod database;
pub mod telemetry;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{InMemoryMemeRepository, InMemoryUserRepository, MemoryStore};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - Postgres
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresMemeRepository, PostgresUserRepository, connect};

#[cfg(all(test, feature = "auth"))]
mod tests;
