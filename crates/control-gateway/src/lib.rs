//! Gateway wiring: builds the control exchange from configuration and
//! exposes the channel seams the deployment environment attaches to.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use application::{ControlExchange, ControlListener, SchemaRegistry};
use domain::{DeviceDirectory, GatewayEvent, ValidatedCommand};
use infrastructure::{
    ChannelCommandDispatcher, ChannelEventPublisher, CompositeEventPublisher, DeviceSeed,
    DirectoryConfig, GatewayConfig, MemoryDeviceDirectory, PgDeviceDirectory,
    TracingEventPublisher,
};

/// A running exchange plus its three seams:
/// - `inbound` is where the transport layer writes raw messages
/// - `commands` is what the device-command dispatcher consumes
/// - `events` reports every exchange outcome
pub struct GatewayRuntime {
    pub inbound: mpsc::Sender<String>,
    pub commands: mpsc::Receiver<ValidatedCommand>,
    pub events: mpsc::UnboundedReceiver<GatewayEvent>,
    pub shutdown: CancellationToken,
    pub listener: JoinHandle<()>,
}

impl GatewayRuntime {
    pub async fn start(config: GatewayConfig) -> Result<Self> {
        let directory = build_directory(config.directory).await?;

        let (command_tx, commands) = mpsc::channel(config.queue_capacity);
        let dispatcher = Arc::new(ChannelCommandDispatcher::new(command_tx));

        let (event_publisher, events) = ChannelEventPublisher::new();
        let event_fanout = Arc::new(CompositeEventPublisher::new(vec![
            Arc::new(TracingEventPublisher),
            Arc::new(event_publisher),
        ]));

        let exchange = Arc::new(ControlExchange::new(
            config.gateway_id,
            Arc::new(SchemaRegistry::with_defaults()),
            directory,
            dispatcher,
            event_fanout,
        ));

        let shutdown = CancellationToken::new();
        let (inbound, inbound_rx) = mpsc::channel(config.queue_capacity);
        let listener =
            tokio::spawn(ControlListener::new(exchange, shutdown.clone()).run(inbound_rx));

        Ok(Self {
            inbound,
            commands,
            events,
            shutdown,
            listener,
        })
    }

    /// Cancel the listener and wait for it to drain.
    pub async fn stop(self) {
        self.shutdown.cancel();
        let _ = self.listener.await;
    }
}

async fn build_directory(config: DirectoryConfig) -> Result<Arc<dyn DeviceDirectory>> {
    let DirectoryConfig {
        backend,
        database_url,
        devices,
    } = config;

    match backend.as_str() {
        "memory" => {
            info!(devices = devices.len(), "Using in-memory device directory");
            let records = devices.into_iter().map(DeviceSeed::into_record).collect();
            Ok(Arc::new(MemoryDeviceDirectory::seeded(records)))
        }
        "postgres" => {
            let url = database_url
                .context("directory.database_url is required for the postgres backend")?;
            let directory = PgDeviceDirectory::connect(&url).await?;
            directory.ensure_schema().await?;
            Ok(Arc::new(directory))
        }
        other => bail!("Unknown directory backend: {other}"),
    }
}
