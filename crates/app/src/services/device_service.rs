//! Device read side — registry snapshots personalized with user overlays.

use std::sync::Arc;

use hearth_domain::device::DeviceState;
use hearth_domain::error::HearthError;
use hearth_domain::id::AccountId;
use hearth_domain::time::{self, Timestamp};

use crate::ports::OverlayRepository;
use crate::registry::DeviceRegistry;

/// Serves per-user device views.
pub struct DeviceService<O> {
    registry: Arc<DeviceRegistry>,
    overlays: O,
}

impl<O: OverlayRepository + Send + Sync> DeviceService<O> {
    /// Wire the service to the registry and the overlay store.
    pub fn new(registry: Arc<DeviceRegistry>, overlays: O) -> Self {
        Self { registry, overlays }
    }

    /// Registry snapshot with the caller's overlays applied.
    ///
    /// Where the user has an overlay for a device, the overlay *replaces*
    /// the reported state wholesale and the timestamp is bumped to now, so
    /// the dashboard reflects what the user last asked for rather than what
    /// the device last reported.
    ///
    /// # Errors
    ///
    /// Propagates overlay store failures.
    pub async fn devices_for(&self, account_id: AccountId) -> Result<Vec<DeviceState>, HearthError> {
        self.devices_for_at(account_id, time::now()).await
    }

    /// [`devices_for`](Self::devices_for) with an explicit clock.
    ///
    /// # Errors
    ///
    /// Propagates overlay store failures.
    pub async fn devices_for_at(
        &self,
        account_id: AccountId,
        now: Timestamp,
    ) -> Result<Vec<DeviceState>, HearthError> {
        let mut overlays = self.overlays.get_for_account(account_id).await?;
        let mut devices = self.registry.snapshot();
        for device in &mut devices {
            if let Some(overlay) = overlays.remove(&device.device_id) {
                device.state = overlay;
                device.last_updated = now;
            }
        }
        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;

    use hearth_domain::device::StateMap;

    use crate::fanout::FanoutHub;

    #[derive(Default)]
    struct MemOverlays {
        rows: std::sync::Mutex<HashMap<(AccountId, String), StateMap>>,
    }

    impl OverlayRepository for &MemOverlays {
        fn get(
            &self,
            account_id: AccountId,
            device_id: &str,
        ) -> impl Future<Output = Result<Option<StateMap>, HearthError>> + Send {
            let found = self
                .rows
                .lock()
                .unwrap()
                .get(&(account_id, device_id.to_string()))
                .cloned();
            async move { Ok(found) }
        }

        fn get_for_account(
            &self,
            account_id: AccountId,
        ) -> impl Future<Output = Result<HashMap<String, StateMap>, HearthError>> + Send {
            let rows: HashMap<String, StateMap> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|((owner, _), _)| *owner == account_id)
                .map(|((_, device_id), state)| (device_id.clone(), state.clone()))
                .collect();
            async move { Ok(rows) }
        }

        fn upsert(
            &self,
            account_id: AccountId,
            device_id: &str,
            state: &StateMap,
            _updated_at: Timestamp,
        ) -> impl Future<Output = Result<(), HearthError>> + Send {
            self.rows
                .lock()
                .unwrap()
                .insert((account_id, device_id.to_string()), state.clone());
            async { Ok(()) }
        }

        fn delete_for_account(
            &self,
            account_id: AccountId,
        ) -> impl Future<Output = Result<(), HearthError>> + Send {
            self.rows
                .lock()
                .unwrap()
                .retain(|(owner, _), _| *owner != account_id);
            async { Ok(()) }
        }
    }

    fn state(json: serde_json::Value) -> StateMap {
        match json {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn should_replace_state_with_overlay() {
        let registry = Arc::new(DeviceRegistry::new(Arc::new(FanoutHub::new(16))));
        registry.apply_telemetry(
            "living-room-light",
            state(serde_json::json!({"on": false, "brightness": 40})),
        );

        let overlays = MemOverlays::default();
        let account = AccountId::new();
        overlays
            .rows
            .lock()
            .unwrap()
            .insert(
                (account, "living-room-light".to_string()),
                state(serde_json::json!({"on": true})),
            );

        let service = DeviceService::new(registry, &overlays);
        let devices = service.devices_for(account).await.unwrap();
        let light = devices
            .iter()
            .find(|d| d.device_id == "living-room-light")
            .unwrap();

        // wholesale replacement, the reported brightness is gone
        assert_eq!(light.state["on"], serde_json::json!(true));
        assert!(light.state.get("brightness").is_none());
    }

    #[tokio::test]
    async fn should_leave_devices_without_overlay_untouched() {
        let registry = Arc::new(DeviceRegistry::new(Arc::new(FanoutHub::new(16))));
        let overlays = MemOverlays::default();
        let service = DeviceService::new(registry, &overlays);

        let devices = service.devices_for(AccountId::new()).await.unwrap();
        // placeholders only, in deterministic order
        let ids: Vec<&str> = devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids, ["hot-water-1", "living-room-light", "thermostat-1"]);
    }

    #[tokio::test]
    async fn should_not_leak_other_users_overlays() {
        let registry = Arc::new(DeviceRegistry::new(Arc::new(FanoutHub::new(16))));
        let overlays = MemOverlays::default();
        let other = AccountId::new();
        overlays.rows.lock().unwrap().insert(
            (other, "hot-water-1".to_string()),
            state(serde_json::json!({"on": true})),
        );

        let service = DeviceService::new(registry, &overlays);
        let devices = service.devices_for(AccountId::new()).await.unwrap();
        let hot_water = devices
            .iter()
            .find(|d| d.device_id == "hot-water-1")
            .unwrap();
        assert_eq!(hot_water.state["on"], serde_json::json!(false));
    }
}
