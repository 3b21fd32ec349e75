//! Device view and command handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};
use hearth_domain::device::{DeviceState, StateMap};

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Acknowledgement body for an accepted command.
#[derive(Serialize)]
pub struct CommandAccepted {
    /// Always `true`; the command was persisted (delivery is best-effort).
    pub ok: bool,
}

/// `GET /api/devices` — registry snapshot with the caller's overlays applied.
pub async fn list<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
) -> Result<Json<Vec<DeviceState>>, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let devices = state.device_service.devices_for(account_id).await?;
    Ok(Json(devices))
}

/// `POST /api/devices/{id}/command` — submit a state patch for a device.
///
/// The JSON body must be an object (the patch); anything else is rejected by
/// the extractor before the handler runs.
pub async fn command<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
    Path(device_id): Path<String>,
    Json(patch): Json<StateMap>,
) -> Result<Json<CommandAccepted>, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    state
        .command_service
        .submit_command(account_id, &device_id, patch)
        .await?;
    Ok(Json(CommandAccepted { ok: true }))
}
