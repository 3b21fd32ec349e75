//! Live WebSocket feed of device snapshots and alerts.
//!
//! The first frame is always the current device snapshot (taken under the
//! registry lock, so nothing can fall between snapshot and subscription).
//! After that the socket carries one frame per registry change or alert.
//! When the client disconnects, both broadcast receivers drop and the viewer
//! is fully unsubscribed.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use hearth_app::fanout::FanoutHub;
use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};
use hearth_app::registry::DeviceRegistry;
use hearth_domain::alert::Alert;
use hearth_domain::device::DeviceState;

use crate::auth::CallerIdentity;
use crate::state::AppState;

/// One outbound frame.
#[derive(Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
enum Frame<'a> {
    /// Full device snapshot.
    Devices(&'a [DeviceState]),
    /// One alert event.
    Alert(&'a Alert),
}

/// `GET /api/ws` — upgrade to the live feed.
pub async fn upgrade<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    _caller: CallerIdentity,
    ws: WebSocketUpgrade,
) -> Response
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let registry = Arc::clone(&state.registry);
    let fanout = Arc::clone(&state.fanout);
    ws.on_upgrade(move |socket| serve(socket, registry, fanout))
}

async fn serve(mut socket: WebSocket, registry: Arc<DeviceRegistry>, fanout: Arc<FanoutHub>) {
    let (snapshot, mut devices_rx) = registry.subscribe();
    let mut alerts_rx = fanout.subscribe_alerts();

    if send_frame(&mut socket, &Frame::Devices(&snapshot)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = devices_rx.recv() => match update {
                Ok(devices) => {
                    if send_frame(&mut socket, &Frame::Devices(&devices)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // the next received snapshot is complete anyway
                    tracing::warn!(skipped, "viewer lagged behind device updates");
                }
                Err(RecvError::Closed) => break,
            },
            alert = alerts_rx.recv() => match alert {
                Ok(alert) => {
                    if send_frame(&mut socket, &Frame::Alert(&alert)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "viewer lagged behind alerts");
                }
                Err(RecvError::Closed) => break,
            },
            inbound = socket.recv() => match inbound {
                // inbound frames are ignored, the feed is one-way
                Some(Ok(_)) => {}
                Some(Err(_)) | None => break,
            },
        }
    }
    // dropping devices_rx and alerts_rx unsubscribes this viewer
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame<'_>) -> Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(error) => {
            tracing::warn!(%error, "frame serialization failed");
            Ok(())
        }
    }
}
