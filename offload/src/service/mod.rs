//! High-level service facade.
//!
//! [`OffloadService`] owns a running [`DispatchDaemon`] and exposes the two
//! conceptual endpoints the upstream boundary serves: one that always
//! offloads to an isolated execution unit, one that always computes inline.
//!
//! # Example
//!
//! ```ignore
//! use offload::service::{DaemonConfig, OffloadService};
//!
//! let service = OffloadService::start(DaemonConfig::default());
//!
//! let response = service.compute_isolated(30).await?;
//! println!("fibonacci(30) = {}", response.outcome);
//!
//! service.shutdown().await;
//! ```

mod daemon;
mod request;

pub use daemon::{DaemonConfig, DispatchDaemon, DEFAULT_REQUEST_CHANNEL_CAPACITY};
pub use request::{ComputeJob, ComputeResponse};

use crate::dispatcher::ComputeRequest;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Service-level errors.
///
/// These cover the request's path to and from the daemon; computation
/// failures travel inside [`ComputeResponse`] as outcomes, not here.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The daemon is no longer accepting jobs.
    #[error("dispatch daemon unavailable")]
    Unavailable,

    /// The daemon dropped the response channel without answering.
    #[error("response channel closed before an outcome arrived")]
    ResponseDropped,
}

/// Facade over a running dispatch daemon.
pub struct OffloadService {
    request_tx: mpsc::Sender<ComputeJob>,
    shutdown: CancellationToken,
    daemon_task: JoinHandle<()>,
}

impl OffloadService {
    /// Starts the daemon on the current tokio runtime and returns the
    /// facade controlling it.
    pub fn start(config: DaemonConfig) -> Self {
        let (daemon, request_tx) = DispatchDaemon::new(config);
        let shutdown = CancellationToken::new();
        let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

        Self {
            request_tx,
            shutdown,
            daemon_task,
        }
    }

    /// Computes `fib(n)` on an isolated execution unit.
    pub async fn compute_isolated(&self, n: u64) -> Result<ComputeResponse, ServiceError> {
        self.submit(ComputeRequest::isolated(n)).await
    }

    /// Computes `fib(n)` inline, blocking its handling context.
    pub async fn compute_inline(&self, n: u64) -> Result<ComputeResponse, ServiceError> {
        self.submit(ComputeRequest::inline(n)).await
    }

    /// Submits an arbitrary request through the daemon.
    pub async fn submit(&self, request: ComputeRequest) -> Result<ComputeResponse, ServiceError> {
        let (job, response_rx) = ComputeJob::new(request, self.shutdown.child_token());

        self.request_tx
            .send(job)
            .await
            .map_err(|_| ServiceError::Unavailable)?;

        response_rx.await.map_err(|_| ServiceError::ResponseDropped)
    }

    /// Shuts the daemon down and waits for its loop to finish.
    ///
    /// In-flight jobs resolve normally; jobs still queued behind the
    /// shutdown signal are dropped.
    pub async fn shutdown(self) {
        info!("Shutting down offload service");
        self.shutdown.cancel();
        let _ = self.daemon_task.await;
    }
}

impl std::fmt::Debug for OffloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffloadService")
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}
