//! # hearth-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `OverlayRepository` — per-user desired-state patches
//!   - `UsageLedger` — durable per-day on-time minutes
//!   - `AccountRepository` — CRUD for accounts
//!   - `CommandPublisher` — best-effort command delivery to the device bus
//! - Provide the in-process infrastructure that needs no IO:
//!   - `FanoutHub` — live distribution of registry/alert changes to viewers
//!   - `DeviceRegistry` — last-known state per device
//!   - `AlertLog` — bounded, newest-first alert ring buffer
//!   - `UsageAccumulator` — on/off edge → day-bucketed minute accounting
//!   - `TelemetryIngestor` — bus payload decoding and dispatch
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService` — registry snapshot with the caller's overlays applied
//!   - `CommandService` — user command → overlay + accounting + bus
//!   - `AccountService` — register, profile updates, cascade delete
//!
//! ## Dependency rule
//! Depends on `hearth-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod alerts;
pub mod fanout;
pub mod ingest;
pub mod ports;
pub mod registry;
pub mod services;
pub mod usage;
