use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ControlExchange, ExchangeOutcome};

/// Drains the inbound channel the transport layer writes into and runs
/// every payload through the exchange. The transport itself (queue,
/// socket, HTTP) lives outside this crate; the channel sender is the
/// seam it attaches to.
pub struct ControlListener {
    exchange: Arc<ControlExchange>,
    shutdown: CancellationToken,
}

impl ControlListener {
    pub fn new(exchange: Arc<ControlExchange>, shutdown: CancellationToken) -> Self {
        Self { exchange, shutdown }
    }

    pub async fn run(self, mut rx: mpsc::Receiver<String>) {
        info!("Listening for control messages");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Control listener shutting down");
                    break;
                }
                received = rx.recv() => {
                    match received {
                        Some(raw) => {
                            // The exchange logs dispatches and rejections itself
                            let outcome = self.exchange.handle_raw(&raw).await;
                            if matches!(outcome, ExchangeOutcome::Skipped) {
                                debug!("Skipped own-origin exchange message");
                            }
                        }
                        None => {
                            warn!("Inbound channel closed");
                            break;
                        }
                    }
                }
            }
        }
    }
}
