//! Telemetry ingestion — raw bus payloads into registry, ledger, and alerts.

use std::sync::Arc;

use hearth_domain::alert::Alert;
use hearth_domain::device;
use hearth_domain::error::HearthError;
use hearth_domain::time::{self, Timestamp};
use hearth_domain::usage::{Metric, Subject};

use crate::alerts::AlertLog;
use crate::ports::UsageLedger;
use crate::registry::DeviceRegistry;
use crate::usage::UsageAccumulator;

/// Applies incoming telemetry and alert payloads.
///
/// The transport adapter owns topic parsing; this type owns everything after
/// it. Malformed payloads are logged and dropped without failing the
/// ingestion loop.
pub struct TelemetryIngestor<L> {
    registry: Arc<DeviceRegistry>,
    alerts: Arc<AlertLog>,
    usage: Arc<UsageAccumulator<L>>,
}

impl<L: UsageLedger + Send + Sync> TelemetryIngestor<L> {
    /// Wire the ingestor to its sinks.
    pub fn new(
        registry: Arc<DeviceRegistry>,
        alerts: Arc<AlertLog>,
        usage: Arc<UsageAccumulator<L>>,
    ) -> Self {
        Self {
            registry,
            alerts,
            usage,
        }
    }

    /// Ingest one device state report.
    ///
    /// The payload must be a JSON object; anything else is dropped with a
    /// warning. The registry is updated first, then the global ledger gets a
    /// transition if the device kind carries an accounted metric.
    ///
    /// # Errors
    ///
    /// Propagates ledger failures. The registry update has already happened
    /// by then, matching ingest order.
    pub async fn handle_device_state(
        &self,
        device_id: &str,
        payload: &[u8],
    ) -> Result<(), HearthError> {
        self.handle_device_state_at(device_id, payload, time::now())
            .await
    }

    /// [`handle_device_state`](Self::handle_device_state) with an explicit
    /// clock.
    ///
    /// # Errors
    ///
    /// Propagates ledger failures.
    pub async fn handle_device_state_at(
        &self,
        device_id: &str,
        payload: &[u8],
        now: Timestamp,
    ) -> Result<(), HearthError> {
        let state = match serde_json::from_slice::<serde_json::Value>(payload) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                tracing::warn!(device_id, payload = %other, "non-object telemetry dropped");
                return Ok(());
            }
            Err(error) => {
                tracing::warn!(device_id, %error, "unparseable telemetry dropped");
                return Ok(());
            }
        };

        let metric = Metric::for_device_kind(&device::metadata(device_id).kind);
        let reported_on = metric.map(|m| m.reported_on(&state));

        self.registry.apply_telemetry_at(device_id, state, now);

        if let (Some(metric), Some(on)) = (metric, reported_on) {
            self.usage
                .record_transition_at(Subject::Global, metric, on, now)
                .await?;
        }
        Ok(())
    }

    /// Ingest one alert payload, filling defaults for missing fields.
    pub fn handle_alert(&self, payload: &[u8]) {
        self.handle_alert_at(payload, time::now());
    }

    /// [`handle_alert`](Self::handle_alert) with an explicit clock.
    pub fn handle_alert_at(&self, payload: &[u8], received_at: Timestamp) {
        match Alert::from_payload(payload, received_at) {
            Some(alert) => self.alerts.record(alert),
            None => tracing::warn!("non-object alert payload dropped"),
        }
    }
}
