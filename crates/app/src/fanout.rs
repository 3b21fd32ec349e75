//! Fanout hub — distributes registry and alert changes to live viewers.
//!
//! Backed by two independent tokio [`broadcast`] channels, one for full
//! device snapshots and one for alerts. Dropping a receiver is the
//! deterministic unsubscribe, so a disconnecting viewer can never leak a
//! callback. Subscribing and unsubscribing are safe while a publish is in
//! flight.

use tokio::sync::broadcast;

use hearth_domain::alert::Alert;
use hearth_domain::device::DeviceState;

/// In-process fanout hub.
///
/// Publishing succeeds even when there are no active subscribers
/// (the message is simply dropped).
pub struct FanoutHub {
    devices: broadcast::Sender<Vec<DeviceState>>,
    alerts: broadcast::Sender<Alert>,
}

impl FanoutHub {
    /// Create a new hub with the given per-channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (devices, _) = broadcast::channel(capacity);
        let (alerts, _) = broadcast::channel(capacity);
        Self { devices, alerts }
    }

    /// Subscribe to full device snapshots published *after* this call.
    ///
    /// Callers wanting the current state immediately should go through
    /// [`DeviceRegistry::subscribe`](crate::registry::DeviceRegistry::subscribe),
    /// which pairs the receiver with a snapshot taken under the registry
    /// lock.
    #[must_use]
    pub fn subscribe_devices(&self) -> broadcast::Receiver<Vec<DeviceState>> {
        self.devices.subscribe()
    }

    /// Subscribe to alerts published after this call.
    #[must_use]
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.alerts.subscribe()
    }

    /// Publish a full device snapshot to every device subscriber.
    pub fn publish_devices(&self, snapshot: Vec<DeviceState>) {
        // send fails only when there are zero receivers, which is fine
        let _ = self.devices.send(snapshot);
    }

    /// Publish one alert to every alert subscriber.
    pub fn publish_alert(&self, alert: Alert) {
        let _ = self.alerts.send(alert);
    }
}
