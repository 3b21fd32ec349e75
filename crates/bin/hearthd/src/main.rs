//! hearth daemon.
//!
//! Wires the SQLite storage adapter, the MQTT bridge, and the in-process
//! device registry together, then serves the HTTP API.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hearth_adapter_http_axum::AppState;
use hearth_adapter_mqtt::MqttBridge;
use hearth_adapter_storage_sqlite_sqlx as storage;
use hearth_app::alerts::AlertLog;
use hearth_app::fanout::FanoutHub;
use hearth_app::ingest::TelemetryIngestor;
use hearth_app::registry::DeviceRegistry;
use hearth_app::services::account_service::AccountService;
use hearth_app::services::command_service::CommandService;
use hearth_app::services::device_service::DeviceService;
use hearth_app::usage::UsageAccumulator;

use crate::config::Config;

/// Capacity of each broadcast channel feeding live viewers.
const FANOUT_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database = storage::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = database.pool().clone();

    let overlays = Arc::new(storage::SqliteOverlayRepository::new(pool.clone()));
    let ledger = Arc::new(storage::SqliteUsageLedger::new(pool.clone()));
    let accounts = Arc::new(storage::SqliteAccountRepository::new(pool));

    let fanout = Arc::new(FanoutHub::new(FANOUT_CAPACITY));
    let registry = Arc::new(DeviceRegistry::new(Arc::clone(&fanout)));
    let alerts = Arc::new(AlertLog::new(Arc::clone(&fanout)));
    let usage = Arc::new(UsageAccumulator::new(Arc::clone(&ledger)));
    let ingestor = Arc::new(TelemetryIngestor::new(
        Arc::clone(&registry),
        Arc::clone(&alerts),
        Arc::clone(&usage),
    ));

    let (bridge, _mqtt_task) = MqttBridge::start(&config.mqtt, ingestor);

    let device_service = Arc::new(DeviceService::new(
        Arc::clone(&registry),
        Arc::clone(&overlays),
    ));
    let command_service = Arc::new(CommandService::new(
        Arc::clone(&overlays),
        Arc::clone(&usage),
        bridge,
    ));
    let account_service = Arc::new(AccountService::new(accounts, overlays, ledger));

    let state = AppState::new(
        registry,
        alerts,
        fanout,
        usage,
        device_service,
        command_service,
        account_service,
    );
    let app = hearth_adapter_http_axum::build(state);

    let address = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
