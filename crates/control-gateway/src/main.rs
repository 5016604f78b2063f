use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use control_gateway::GatewayRuntime;
use domain::GatewayEvent;
use infrastructure::GatewayConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override Gateway ID
    #[arg(long)]
    gateway_id: Option<String>,
}

#[derive(Default)]
struct ExchangeStats {
    dispatched: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,control_gateway=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🛰️ Control Gateway Starting...");
    info!("🆔 Process ID: {}", std::process::id());

    let args = Args::parse();

    // 1. Load Configuration
    let mut config = GatewayConfig::load(&args.config_dir)?;
    if let Some(id) = args.gateway_id {
        config.gateway_id = id;
    }

    let gateway_id = config.gateway_id.clone();
    let heartbeat_interval = config.heartbeat_interval_secs;
    info!("✅ Loaded configuration for Gateway: {}", gateway_id);
    info!(backend = %config.directory.backend, "💾 Device directory backend");

    // 2. Wire the exchange
    let GatewayRuntime {
        inbound,
        mut commands,
        mut events,
        shutdown,
        listener,
    } = GatewayRuntime::start(config).await?;

    info!("📨 Inbound exchange channel ready; transport layer attaches here");

    // 3. Drain validated commands - stand-in for the device-command
    // dispatcher that consumes this stream in deployment
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            info!(
                message_id = %command.message.id,
                device = %command.message.device,
                control = %command.message.control,
                "➡️ Command ready for device dispatch"
            );
        }
    });

    // 4. Outcome counters for the heartbeat
    let stats = Arc::new(ExchangeStats::default());
    let stats_writer = stats.clone();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                GatewayEvent::CommandDispatched { .. } => {
                    stats_writer.dispatched.fetch_add(1, Ordering::Relaxed);
                }
                GatewayEvent::CommandRejected { .. } => {
                    stats_writer.rejected.fetch_add(1, Ordering::Relaxed);
                }
                GatewayEvent::DispatchFailed { .. } => {
                    stats_writer.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    });

    // 5. Heartbeat Loop
    let heartbeat_stats = stats.clone();
    let heartbeat_gateway_id = gateway_id.clone();
    let heartbeat_handle = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(heartbeat_interval));
        interval.tick().await; // first tick fires immediately, skip it

        loop {
            interval.tick().await;
            info!(
                gateway_id = %heartbeat_gateway_id,
                dispatched = heartbeat_stats.dispatched.load(Ordering::Relaxed),
                rejected = heartbeat_stats.rejected.load(Ordering::Relaxed),
                failed = heartbeat_stats.failed.load(Ordering::Relaxed),
                "💓 Heartbeat"
            );
        }
    });

    // 6. Shutdown Signal
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutting down..."),
        Err(err) => warn!(error = %err, "Unable to listen for shutdown signal"),
    }

    shutdown.cancel();
    heartbeat_handle.abort();
    let _ = listener.await;
    drop(inbound);

    info!("👋 Good bye!");
    Ok(())
}
