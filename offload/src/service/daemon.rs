//! Dispatch daemon - long-running request loop over the dispatcher.
//!
//! The [`DispatchDaemon`] receives [`ComputeJob`]s from a bounded channel
//! and answers each on its oneshot response channel. Every job is handled
//! on its own tokio task, so an inline job blocks only its own handling
//! context - the daemon loop and all other in-flight jobs keep going,
//! which is exactly the contrast the two execution modes exist to show.
//!
//! # Example
//!
//! ```ignore
//! use offload::service::{ComputeJob, DaemonConfig, DispatchDaemon};
//! use tokio_util::sync::CancellationToken;
//!
//! let (daemon, request_tx) = DispatchDaemon::new(DaemonConfig::default());
//! let shutdown = CancellationToken::new();
//! tokio::spawn(daemon.run(shutdown.clone()));
//!
//! let (job, response_rx) = ComputeJob::isolated(30);
//! request_tx.send(job).await?;
//! let response = response_rx.await?;
//! ```

use super::request::{ComputeJob, ComputeResponse};
use crate::dispatcher::{Dispatcher, DispatcherConfig};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default capacity of the daemon's request channel.
pub const DEFAULT_REQUEST_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the dispatch daemon.
#[derive(Clone, Debug)]
pub struct DaemonConfig {
    /// Dispatcher configuration.
    pub dispatcher: DispatcherConfig,

    /// Request channel capacity.
    pub channel_capacity: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::default(),
            channel_capacity: DEFAULT_REQUEST_CHANNEL_CAPACITY,
        }
    }
}

impl From<&crate::config::ConfigFile> for DaemonConfig {
    fn from(config: &crate::config::ConfigFile) -> Self {
        Self {
            dispatcher: DispatcherConfig::from(&config.dispatcher),
            channel_capacity: config.daemon.request_channel_capacity,
        }
    }
}

// =============================================================================
// Dispatch Daemon
// =============================================================================

/// Long-running service loop over the dispatcher.
pub struct DispatchDaemon {
    dispatcher: Arc<Dispatcher>,
    request_rx: mpsc::Receiver<ComputeJob>,
}

impl DispatchDaemon {
    /// Creates a daemon and the sender callers submit jobs through.
    pub fn new(config: DaemonConfig) -> (Self, mpsc::Sender<ComputeJob>) {
        let (request_tx, request_rx) = mpsc::channel(config.channel_capacity);
        let daemon = Self {
            dispatcher: Arc::new(Dispatcher::new(config.dispatcher)),
            request_rx,
        };
        (daemon, request_tx)
    }

    /// Runs the daemon until shutdown is signalled or all senders drop.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Dispatch daemon started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Dispatch daemon shutting down");
                    break;
                }

                job = self.request_rx.recv() => {
                    match job {
                        Some(job) => self.handle_job(job),
                        None => {
                            info!("All request senders dropped, dispatch daemon stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Dispatches one job on its own task and routes the response back.
    fn handle_job(&self, job: ComputeJob) {
        if job.cancellation.is_cancelled() {
            debug!(request = %job.request, "Job cancelled before dispatch, dropping");
            return;
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = dispatcher.submit(job.request).await;
            let response = ComputeResponse::new(outcome, started.elapsed());

            if job.response_tx.send(response).is_err() {
                // Caller went away; the outcome is already resolved, so
                // there is nothing left to release.
                debug!(request = %job.request, "Caller dropped before receiving response");
            }
        });
    }
}

impl std::fmt::Debug for DispatchDaemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchDaemon").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_config_default() {
        let config = DaemonConfig::default();
        assert_eq!(config.channel_capacity, DEFAULT_REQUEST_CHANNEL_CAPACITY);
    }

    #[tokio::test]
    async fn test_daemon_answers_isolated_job() {
        let (daemon, request_tx) = DispatchDaemon::new(DaemonConfig::default());
        let shutdown = CancellationToken::new();
        let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

        let (job, response_rx) = ComputeJob::isolated(10);
        request_tx.send(job).await.unwrap();

        let response = response_rx.await.unwrap();
        assert_eq!(response.value(), Some(55));

        shutdown.cancel();
        let _ = daemon_task.await;
    }

    #[tokio::test]
    async fn test_daemon_drops_pre_cancelled_job() {
        let (daemon, request_tx) = DispatchDaemon::new(DaemonConfig::default());
        let shutdown = CancellationToken::new();
        let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

        let token = CancellationToken::new();
        token.cancel();
        let (job, response_rx) =
            ComputeJob::new(crate::dispatcher::ComputeRequest::isolated(10), token);
        request_tx.send(job).await.unwrap();

        // The daemon drops the job, so the response channel just closes.
        assert!(response_rx.await.is_err());

        shutdown.cancel();
        let _ = daemon_task.await;
    }

    #[tokio::test]
    async fn test_daemon_stops_when_senders_drop() {
        let (daemon, request_tx) = DispatchDaemon::new(DaemonConfig::default());
        let daemon_task = tokio::spawn(daemon.run(CancellationToken::new()));

        drop(request_tx);

        tokio::time::timeout(std::time::Duration::from_secs(1), daemon_task)
            .await
            .expect("daemon should stop once all senders drop")
            .unwrap();
    }
}
