//! Periodic station refresh for the contract on screen.

use std::sync::Arc;
use std::time::Duration;

use bicycle_transit::{Contract, DataFetcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::error::Result;
use crate::stations::{StationCache, Stations};

/// Refreshes one contract's stations every period until stopped or dropped
///
/// Must be started from within a tokio runtime.
pub struct StationPoller {
    handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StationPoller {
    pub fn start<F>(
        cache: Arc<StationCache<F>>,
        contract: Arc<Contract>,
        period: Duration,
        updates: mpsc::Sender<Result<Stations>>,
    ) -> Self
    where
        F: DataFetcher + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            debug!("start station poller for {}", contract.name);
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let result = cache.refresh_stations(&contract).await;
                        if updates.send(result).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("stop station poller for {}", contract.name);
        });

        Self {
            handle,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for StationPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
