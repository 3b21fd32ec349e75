//! # hearth-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API (`/api/devices`, `/api/alerts`, `/api/insights/…`,
//!   `/api/account`)
//! - Serve the live WebSocket feed at `/api/ws`
//! - Resolve the caller's identity from the `x-user-id` header (the header
//!   is stamped by the external auth layer in front of this service)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for port traits and services) and `hearth-domain`
//! (for domain types used in request/response mapping). Never leaks axum
//! types into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;

pub use router::build;
pub use state::AppState;
