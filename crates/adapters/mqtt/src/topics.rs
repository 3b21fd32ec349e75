//! Topic layout of the device bus.
//!
//! - `devices/<id>/state` — telemetry reports (subscribed with a `+` wildcard)
//! - `alerts/high` — high-priority alert events
//! - `devices/<id>/command` — outgoing user commands

/// Subscription filter matching every device's state topic.
pub const DEVICE_STATE_FILTER: &str = "devices/+/state";

/// Topic carrying high-priority alerts.
pub const ALERTS_TOPIC: &str = "alerts/high";

/// Command topic for one device.
#[must_use]
pub fn command_topic(device_id: &str) -> String {
    format!("devices/{device_id}/command")
}

/// A recognized inbound topic.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Telemetry from one device.
    DeviceState {
        /// Device id segment of the topic.
        device_id: &'a str,
    },
    /// A high-priority alert.
    Alert,
}

/// Classify an inbound topic, `None` for anything the bridge did not
/// subscribe to.
#[must_use]
pub fn parse(topic: &str) -> Option<Inbound<'_>> {
    if topic == ALERTS_TOPIC {
        return Some(Inbound::Alert);
    }
    let mut segments = topic.split('/');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some("devices"), Some(device_id), Some("state"), None) if !device_id.is_empty() => {
            Some(Inbound::DeviceState { device_id })
        }
        _ => None,
    }
}
