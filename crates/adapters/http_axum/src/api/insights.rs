//! Usage history handlers.
//!
//! Both endpoints report the caller's own ledger, with the currently open
//! interval (if any) folded into today before rounding.

use axum::Json;
use axum::extract::State;

use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};
use hearth_domain::id::AccountId;
use hearth_domain::usage::{Metric, Subject, UsageDay};

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/insights/heating-history`
pub async fn heating_history<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
) -> Result<Json<Vec<UsageDay>>, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    history(&state, account_id, Metric::Heating).await
}

/// `GET /api/insights/hot-water-history`
pub async fn hot_water_history<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
) -> Result<Json<Vec<UsageDay>>, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    history(&state, account_id, Metric::HotWater).await
}

async fn history<O, L, A, P>(
    state: &AppState<O, L, A, P>,
    account_id: AccountId,
    metric: Metric,
) -> Result<Json<Vec<UsageDay>>, ApiError>
where
    L: UsageLedger + Send + Sync + 'static,
{
    let subject = Subject::Account(account_id);
    let live_extra = state.usage.open_interval_seconds(subject, metric).await;
    let days = state.usage.history(subject, metric, live_extra).await?;
    Ok(Json(days))
}
