//! Shared application state for axum handlers.

use std::sync::Arc;

use hearth_app::alerts::AlertLog;
use hearth_app::fanout::FanoutHub;
use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};
use hearth_app::registry::DeviceRegistry;
use hearth_app::services::account_service::AccountService;
use hearth_app::services::command_service::CommandService;
use hearth_app::services::device_service::DeviceService;
use hearth_app::usage::UsageAccumulator;

/// Application state shared across all axum handlers.
///
/// Generic over the port implementations to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<O, L, A, P> {
    /// Live device cache.
    pub registry: Arc<DeviceRegistry>,
    /// Alert ring buffer.
    pub alerts: Arc<AlertLog>,
    /// Fanout hub for the WebSocket feed.
    pub fanout: Arc<FanoutHub>,
    /// Usage accumulator shared with ingestion.
    pub usage: Arc<UsageAccumulator<L>>,
    /// Personalized device views.
    pub device_service: Arc<DeviceService<O>>,
    /// Command gateway.
    pub command_service: Arc<CommandService<O, L, P>>,
    /// Account lifecycle.
    pub account_service: Arc<AccountService<A, O, L>>,
}

impl<O, L, A, P> Clone for AppState<O, L, A, P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            alerts: Arc::clone(&self.alerts),
            fanout: Arc::clone(&self.fanout),
            usage: Arc::clone(&self.usage),
            device_service: Arc::clone(&self.device_service),
            command_service: Arc::clone(&self.command_service),
            account_service: Arc::clone(&self.account_service),
        }
    }
}

impl<O, L, A, P> AppState<O, L, A, P>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` components.
    ///
    /// All of these are shared with the ingestion side, so they arrive
    /// already wrapped.
    #[must_use]
    pub fn new(
        registry: Arc<DeviceRegistry>,
        alerts: Arc<AlertLog>,
        fanout: Arc<FanoutHub>,
        usage: Arc<UsageAccumulator<L>>,
        device_service: Arc<DeviceService<O>>,
        command_service: Arc<CommandService<O, L, P>>,
        account_service: Arc<AccountService<A, O, L>>,
    ) -> Self {
        Self {
            registry,
            alerts,
            fanout,
            usage,
            device_service,
            command_service,
            account_service,
        }
    }
}
