//! # hearth-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `hearth-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for port traits) and `hearth-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod account_repo;
pub mod error;
pub mod overlay_repo;
pub mod pool;
pub mod usage_repo;

pub use account_repo::SqliteAccountRepository;
pub use error::StorageError;
pub use overlay_repo::SqliteOverlayRepository;
pub use pool::{Config, Database};
pub use usage_repo::SqliteUsageLedger;
