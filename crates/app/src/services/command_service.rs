//! Command gateway — persists a user's desired state and forwards it to the
//! device.

use std::sync::Arc;

use hearth_domain::device::{self, StateMap};
use hearth_domain::error::{HearthError, ValidationError};
use hearth_domain::id::AccountId;
use hearth_domain::time::{self, Timestamp};
use hearth_domain::usage::{Metric, Subject};

use crate::ports::{CommandPublisher, OverlayRepository, UsageLedger};
use crate::usage::UsageAccumulator;

/// Accepts device command patches on behalf of a user.
pub struct CommandService<O, L, P> {
    overlays: O,
    usage: Arc<UsageAccumulator<L>>,
    publisher: P,
}

impl<O, L, P> CommandService<O, L, P>
where
    O: OverlayRepository + Send + Sync,
    L: UsageLedger + Send + Sync,
    P: CommandPublisher + Send + Sync,
{
    /// Wire the gateway to its overlay store, accumulator, and command bus.
    pub fn new(overlays: O, usage: Arc<UsageAccumulator<L>>, publisher: P) -> Self {
        Self {
            overlays,
            usage,
            publisher,
        }
    }

    /// Submit one command patch.
    ///
    /// The patch is shallow-merged into the user's stored overlay (patch
    /// keys win) and upserted, so repeated commands keep exactly one row per
    /// (user, device). If the device kind carries an accounted metric and
    /// the patch touches that metric's field, the transition is credited to
    /// the user's ledger. Finally the *raw* patch, not the merged overlay,
    /// goes out on the command bus, best-effort.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidDeviceId`] for an empty device id;
    /// persistence failures from the overlay store or ledger. A publish
    /// failure is never an error.
    pub async fn submit_command(
        &self,
        account_id: AccountId,
        device_id: &str,
        patch: StateMap,
    ) -> Result<(), HearthError> {
        self.submit_command_at(account_id, device_id, patch, time::now())
            .await
    }

    /// [`submit_command`](Self::submit_command) with an explicit clock.
    ///
    /// # Errors
    ///
    /// Same as [`submit_command`](Self::submit_command).
    pub async fn submit_command_at(
        &self,
        account_id: AccountId,
        device_id: &str,
        patch: StateMap,
        now: Timestamp,
    ) -> Result<(), HearthError> {
        if device_id.trim().is_empty() {
            return Err(ValidationError::InvalidDeviceId.into());
        }

        let mut merged = self
            .overlays
            .get(account_id, device_id)
            .await?
            .unwrap_or_default();
        for (key, value) in &patch {
            merged.insert(key.clone(), value.clone());
        }
        self.overlays
            .upsert(account_id, device_id, &merged, now)
            .await?;

        if let Some(metric) = Metric::for_device_kind(&device::metadata(device_id).kind)
            && let Some(on) = metric.commanded_on(&patch)
        {
            self.usage
                .record_transition_at(Subject::Account(account_id), metric, on, now)
                .await?;
        }

        tracing::info!(%account_id, device_id, "command accepted");
        self.publisher.publish_command(device_id, &patch).await;
        Ok(())
    }
}
