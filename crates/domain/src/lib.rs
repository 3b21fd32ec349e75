//! # hearth-domain
//!
//! Pure domain model for the hearth device-state synchronization engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **device state** (last-known telemetry per device) and the static
//!   device metadata table
//! - Define **alerts** (immutable high-priority events)
//! - Define **usage accounting** value types (metrics, subjects, day buckets)
//! - Define **accounts** (dashboard users owning overlays and ledgers)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod account;
pub mod alert;
pub mod device;
pub mod usage;
