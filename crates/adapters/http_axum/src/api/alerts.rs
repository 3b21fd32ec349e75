//! Alert history handler.

use axum::Json;
use axum::extract::State;

use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};
use hearth_domain::alert::Alert;

use crate::auth::CallerIdentity;
use crate::state::AppState;

/// `GET /api/alerts` — the retained alerts, newest first.
pub async fn list<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    _caller: CallerIdentity,
) -> Json<Vec<Alert>>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    Json(state.alerts.snapshot())
}
