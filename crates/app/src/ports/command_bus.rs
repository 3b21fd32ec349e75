//! Command bus port — best-effort delivery of user commands to devices.

use std::future::Future;

use hearth_domain::device::StateMap;

/// Publishes a command patch to a device's command topic.
///
/// Delivery is strictly best-effort: an unavailable bus is a no-op, never an
/// error. The command gateway persists the overlay before publishing, so a
/// dropped publish loses nothing durable.
pub trait CommandPublisher {
    /// Publish `patch` to the command topic of `device_id`.
    fn publish_command(
        &self,
        device_id: &str,
        patch: &StateMap,
    ) -> impl Future<Output = ()> + Send;
}

impl<T: CommandPublisher + Send + Sync> CommandPublisher for std::sync::Arc<T> {
    fn publish_command(
        &self,
        device_id: &str,
        patch: &StateMap,
    ) -> impl Future<Output = ()> + Send {
        (**self).publish_command(device_id, patch)
    }
}
