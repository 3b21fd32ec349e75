//! # hearth-adapter-mqtt
//!
//! MQTT adapter — bridges the device bus into hearth.
//!
//! ## Responsibilities
//! - Own the [rumqttc](https://docs.rs/rumqttc) client and its event loop
//! - Subscribe to telemetry and alert topics on every (re)connection
//! - Hand inbound payloads to the [`TelemetryIngestor`]
//! - Publish user commands back to the bus, best-effort
//!
//! ## Dependency rule
//! Same as other adapters: depends on `hearth-app` and `hearth-domain`.

pub mod config;
pub mod error;
pub mod topics;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::task::JoinHandle;

use hearth_app::ingest::TelemetryIngestor;
use hearth_app::ports::{CommandPublisher, UsageLedger};
use hearth_domain::device::StateMap;

pub use config::MqttConfig;
pub use error::MqttError;

/// How long to back off after an event-loop error before polling again.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Handle to the MQTT connection.
///
/// Cloning is cheap; every clone publishes through the same client. The
/// ingestion loop runs on a background task spawned by [`MqttBridge::start`]
/// and keeps polling through connection errors (reconnecting is rumqttc's
/// job, resubscribing is ours).
#[derive(Clone)]
pub struct MqttBridge {
    client: AsyncClient,
}

impl MqttBridge {
    /// Connect to the broker and spawn the ingestion loop.
    ///
    /// Returns the publishing handle and the loop's join handle. The loop
    /// never exits on its own.
    #[must_use]
    pub fn start<L>(
        config: &MqttConfig,
        ingestor: Arc<TelemetryIngestor<L>>,
    ) -> (Self, JoinHandle<()>)
    where
        L: UsageLedger + Send + Sync + 'static,
    {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs.into()));

        let (client, event_loop) = AsyncClient::new(options, config.channel_capacity);
        let task = tokio::spawn(run_loop(client.clone(), event_loop, ingestor));
        (Self { client }, task)
    }
}

impl CommandPublisher for MqttBridge {
    /// Publish a command patch, best-effort.
    ///
    /// A full request channel or lost connection is logged and swallowed;
    /// the caller already persisted the overlay.
    async fn publish_command(&self, device_id: &str, patch: &StateMap) {
        let payload = match serde_json::to_vec(patch) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::error!(device_id, error = %MqttError::from(error), "command dropped");
                return;
            }
        };
        let topic = topics::command_topic(device_id);
        if let Err(error) = self.client.try_publish(topic, QoS::AtMostOnce, false, payload) {
            tracing::warn!(device_id, %error, "command publish skipped");
        }
    }
}

async fn run_loop<L>(
    client: AsyncClient,
    mut event_loop: EventLoop,
    ingestor: Arc<TelemetryIngestor<L>>,
) where
    L: UsageLedger + Send + Sync,
{
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("connected to broker");
                if let Err(error) = subscribe(&client).await {
                    tracing::error!(%error, "topic subscription failed");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                dispatch(&ingestor, &publish.topic, &publish.payload).await;
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "event loop error, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

async fn subscribe(client: &AsyncClient) -> Result<(), MqttError> {
    client
        .subscribe(topics::DEVICE_STATE_FILTER, QoS::AtMostOnce)
        .await?;
    client.subscribe(topics::ALERTS_TOPIC, QoS::AtMostOnce).await?;
    Ok(())
}

async fn dispatch<L>(ingestor: &TelemetryIngestor<L>, topic: &str, payload: &[u8])
where
    L: UsageLedger + Send + Sync,
{
    match topics::parse(topic) {
        Some(topics::Inbound::DeviceState { device_id }) => {
            // registry update happens regardless; only the ledger write can fail
            if let Err(error) = ingestor.handle_device_state(device_id, payload).await {
                tracing::error!(device_id, %error, "usage accounting failed");
            }
        }
        Some(topics::Inbound::Alert) => ingestor.handle_alert(payload),
        None => tracing::debug!(topic, "unexpected topic ignored"),
    }
}
