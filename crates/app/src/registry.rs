//! Device registry — process-lifetime cache of last-known state per device.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use hearth_domain::device::{self, DeviceState, StateMap};
use hearth_domain::time::{self, Timestamp};

use crate::fanout::FanoutHub;

/// Authoritative in-process cache of current device state.
///
/// Populated from telemetry; entries are overwritten wholesale and never
/// removed. Every change publishes the *full* snapshot (not a diff) to the
/// fanout hub. The internal lock is only ever held for map access, never
/// across an await point.
pub struct DeviceRegistry {
    devices: Mutex<HashMap<String, DeviceState>>,
    fanout: Arc<FanoutHub>,
}

impl DeviceRegistry {
    /// Create an empty registry publishing to the given hub.
    #[must_use]
    pub fn new(fanout: Arc<FanoutHub>) -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            fanout,
        }
    }

    /// Replace the stored state for a device and notify all viewers.
    ///
    /// Unknown device ids get synthesized metadata; this never fails.
    pub fn apply_telemetry(&self, device_id: &str, state: StateMap) {
        self.apply_telemetry_at(device_id, state, time::now());
    }

    /// [`apply_telemetry`](Self::apply_telemetry) with an explicit clock.
    pub fn apply_telemetry_at(&self, device_id: &str, state: StateMap, at: Timestamp) {
        let snapshot = {
            let mut devices = self.devices.lock().expect("registry lock poisoned");
            devices.insert(
                device_id.to_string(),
                DeviceState::from_telemetry(device_id, state, at),
            );
            Self::snapshot_locked(&mut devices, at)
        };
        tracing::debug!(device_id, "telemetry applied");
        self.fanout.publish_devices(snapshot);
    }

    /// Current devices, placeholders included, sorted by device id.
    ///
    /// Never empty: well-known devices that have not reported yet are
    /// injected with their deterministic default state.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DeviceState> {
        let mut devices = self.devices.lock().expect("registry lock poisoned");
        Self::snapshot_locked(&mut devices, time::now())
    }

    /// Current snapshot plus a receiver for every future change.
    ///
    /// Both are produced under the registry lock, so no change can fall in
    /// the gap between the snapshot and the subscription. Dropping the
    /// receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> (Vec<DeviceState>, broadcast::Receiver<Vec<DeviceState>>) {
        let mut devices = self.devices.lock().expect("registry lock poisoned");
        let snapshot = Self::snapshot_locked(&mut devices, time::now());
        let receiver = self.fanout.subscribe_devices();
        (snapshot, receiver)
    }

    fn snapshot_locked(
        devices: &mut HashMap<String, DeviceState>,
        at: Timestamp,
    ) -> Vec<DeviceState> {
        for placeholder in device::placeholders(at) {
            devices
                .entry(placeholder.device_id.clone())
                .or_insert(placeholder);
        }
        let mut list: Vec<DeviceState> = devices.values().cloned().collect();
        list.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        list
    }
}
