//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` and a plain health probe at `/health`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<O, L, A, P>(state: AppState<O, L, A, P>) -> Router
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
