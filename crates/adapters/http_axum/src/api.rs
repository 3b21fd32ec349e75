//! JSON REST and WebSocket API handlers, mounted under `/api`.

use axum::Router;
use axum::routing::get;

use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};

use crate::state::AppState;

pub mod account;
pub mod alerts;
pub mod devices;
pub mod insights;
pub mod ws;

/// Build the `/api` subrouter.
pub fn routes<O, L, A, P>() -> Router<AppState<O, L, A, P>>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/devices", get(devices::list))
        .route("/devices/{id}/command", axum::routing::post(devices::command))
        .route("/alerts", get(alerts::list))
        .route("/insights/heating-history", get(insights::heating_history))
        .route(
            "/insights/hot-water-history",
            get(insights::hot_water_history),
        )
        .route(
            "/account",
            get(account::get)
                .post(account::register)
                .patch(account::update)
                .delete(account::delete),
        )
        .route("/ws", get(ws::upgrade))
}
