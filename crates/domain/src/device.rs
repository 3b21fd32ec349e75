//! Device state — the last-known telemetry snapshot for one device.
//!
//! Devices are not registered anywhere; identity is the free-form device id
//! carried in the telemetry topic. A static metadata table maps the
//! well-known ids of the installation to a kind and display name, and
//! anything else is synthesized as `unknown` so ingestion never fails on an
//! unexpected device.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Opaque key/value state map as reported by a device or requested by a user.
pub type StateMap = serde_json::Map<String, serde_json::Value>;

/// Last-known state of one device.
///
/// Owned by the registry; overwritten wholesale on every telemetry message
/// and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    /// Stable identity, taken from the telemetry topic.
    pub device_id: String,
    /// Device category (`light`, `thermostat`, `hot-water`, …).
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable display name.
    pub name: String,
    /// Raw reported state, no schema enforced.
    pub state: StateMap,
    /// When this snapshot was taken.
    pub last_updated: Timestamp,
}

impl DeviceState {
    /// Build a snapshot for `device_id` from a raw state map, filling in
    /// kind and name from the metadata table.
    #[must_use]
    pub fn from_telemetry(device_id: &str, state: StateMap, at: Timestamp) -> Self {
        let meta = metadata(device_id);
        Self {
            device_id: device_id.to_string(),
            kind: meta.kind,
            name: meta.name,
            state,
            last_updated: at,
        }
    }
}

/// Kind and display name for a device id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMeta {
    /// Device category.
    pub kind: String,
    /// Display name.
    pub name: String,
}

const DEVICE_META: &[(&str, &str, &str)] = &[
    ("living-room-light", "light", "Living Room Light"),
    ("thermostat-1", "thermostat", "Thermostat"),
    ("motion-sensor-1", "motion", "Motion Sensor"),
    ("hot-water-1", "hot-water", "Hot Water"),
];

/// Look up the static metadata for a device id.
///
/// Unknown ids are never an error: they get kind `unknown` and their own id
/// as display name.
#[must_use]
pub fn metadata(device_id: &str) -> DeviceMeta {
    DEVICE_META
        .iter()
        .find(|(id, _, _)| *id == device_id)
        .map_or_else(
            || DeviceMeta {
                kind: "unknown".to_string(),
                name: device_id.to_string(),
            },
            |(_, kind, name)| DeviceMeta {
                kind: (*kind).to_string(),
                name: (*name).to_string(),
            },
        )
}

/// Placeholder snapshots for well-known devices that have not reported yet,
/// so a fresh dashboard is never empty. Deterministic default state.
#[must_use]
pub fn placeholders(at: Timestamp) -> Vec<DeviceState> {
    [
        ("living-room-light", serde_json::json!({"on": false})),
        ("hot-water-1", serde_json::json!({"on": false})),
        (
            "thermostat-1",
            serde_json::json!({"temperature": 20, "setpoint": 20, "heatingOn": false}),
        ),
    ]
    .into_iter()
    .map(|(id, state)| {
        let serde_json::Value::Object(state) = state else {
            unreachable!("placeholder states are object literals")
        };
        DeviceState::from_telemetry(id, state, at)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_resolve_metadata_for_well_known_device() {
        let meta = metadata("thermostat-1");
        assert_eq!(meta.kind, "thermostat");
        assert_eq!(meta.name, "Thermostat");
    }

    #[test]
    fn should_synthesize_metadata_for_unknown_device() {
        let meta = metadata("garage-door-9");
        assert_eq!(meta.kind, "unknown");
        assert_eq!(meta.name, "garage-door-9");
    }

    #[test]
    fn should_serialize_with_wire_field_names() {
        let state = DeviceState::from_telemetry("hot-water-1", StateMap::new(), now());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["deviceId"], "hot-water-1");
        assert_eq!(json["type"], "hot-water");
        assert!(json["lastUpdated"].is_string());
    }

    #[test]
    fn should_provide_deterministic_placeholder_states() {
        let at = now();
        let devices = placeholders(at);
        assert_eq!(devices.len(), 3);

        let thermostat = devices
            .iter()
            .find(|d| d.device_id == "thermostat-1")
            .unwrap();
        assert_eq!(thermostat.state["heatingOn"], serde_json::json!(false));
        assert_eq!(thermostat.state["setpoint"], serde_json::json!(20));
    }
}
