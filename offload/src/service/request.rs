//! Compute job and response types for daemon communication.
//!
//! These are the message types exchanged between callers (CLI, embedding
//! code) and the dispatch daemon over channels - the boundary whatever
//! transport fronts the service talks through.
//!
//! ```text
//! ┌──────────────┐
//! │   Caller     │──► ComputeJob ─────► ┌─────────────────┐
//! └──────────────┘                      │ Dispatch Daemon │
//!        ◄──── ComputeResponse ──────── └─────────────────┘
//! ```

use crate::dispatcher::{ComputeRequest, Outcome};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Compute Job
// =============================================================================

/// A computation request in flight to the dispatch daemon.
///
/// Every job carries a response channel: both conceptual endpoints block
/// their caller until the outcome is known. The cancellation token lets a
/// caller abandon a job that has not been dispatched yet.
pub struct ComputeJob {
    /// The underlying compute request (input + mode).
    pub request: ComputeRequest,

    /// Cancellation signal; a job cancelled before dispatch is dropped.
    pub cancellation: CancellationToken,

    /// Channel the daemon answers on.
    pub response_tx: oneshot::Sender<ComputeResponse>,
}

impl ComputeJob {
    /// Creates an isolated-mode job.
    ///
    /// # Returns
    ///
    /// The job and the receiver for its response.
    pub fn isolated(n: u64) -> (Self, oneshot::Receiver<ComputeResponse>) {
        Self::new(ComputeRequest::isolated(n), CancellationToken::new())
    }

    /// Creates an inline-mode job.
    pub fn inline(n: u64) -> (Self, oneshot::Receiver<ComputeResponse>) {
        Self::new(ComputeRequest::inline(n), CancellationToken::new())
    }

    /// Creates a job from an arbitrary request with a shared cancellation
    /// token.
    ///
    /// Useful when the caller wants to cancel all of its pending jobs at
    /// once (e.g. during shutdown).
    pub fn new(
        request: ComputeRequest,
        cancellation: CancellationToken,
    ) -> (Self, oneshot::Receiver<ComputeResponse>) {
        let (tx, rx) = oneshot::channel();
        let job = Self {
            request,
            cancellation,
            response_tx: tx,
        };
        (job, rx)
    }
}

impl std::fmt::Debug for ComputeJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeJob")
            .field("request", &self.request)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

// =============================================================================
// Compute Response
// =============================================================================

/// Response to one compute job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeResponse {
    /// The resolved outcome.
    pub outcome: Outcome,

    /// How long the job took, including queue time.
    pub duration: Duration,
}

impl ComputeResponse {
    /// Creates a new response.
    pub fn new(outcome: Outcome, duration: Duration) -> Self {
        Self { outcome, duration }
    }

    /// Returns true if the outcome is a success.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Returns the computed value, if any.
    pub fn value(&self) -> Option<u64> {
        self.outcome.value()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ExecMode;

    #[test]
    fn test_isolated_job_mode() {
        let (job, _rx) = ComputeJob::isolated(30);
        assert_eq!(job.request.n, 30);
        assert_eq!(job.request.mode, ExecMode::Isolated);
    }

    #[test]
    fn test_inline_job_mode() {
        let (job, _rx) = ComputeJob::inline(30);
        assert_eq!(job.request.mode, ExecMode::Inline);
    }

    #[test]
    fn test_job_with_shared_cancellation() {
        let token = CancellationToken::new();
        let (job, _rx) = ComputeJob::new(ComputeRequest::isolated(10), token.clone());

        assert!(!job.cancellation.is_cancelled());
        token.cancel();
        assert!(job.cancellation.is_cancelled());
    }

    #[tokio::test]
    async fn test_response_channel_roundtrip() {
        let (job, rx) = ComputeJob::isolated(10);

        let response = ComputeResponse::new(Outcome::success(55), Duration::from_millis(12));
        job.response_tx.send(response.clone()).unwrap();

        let received = rx.await.unwrap();
        assert_eq!(received, response);
        assert_eq!(received.value(), Some(55));
    }

    #[test]
    fn test_response_helpers() {
        let success = ComputeResponse::new(Outcome::success(1), Duration::ZERO);
        assert!(success.is_success());
        assert_eq!(success.value(), Some(1));

        let failure = ComputeResponse::new(
            Outcome::failure(crate::dispatcher::FailureKind::AbnormalExit { code: 1 }),
            Duration::ZERO,
        );
        assert!(!failure.is_success());
        assert_eq!(failure.value(), None);
    }

    #[test]
    fn test_job_debug_format() {
        let (job, _rx) = ComputeJob::isolated(5);
        let debug = format!("{:?}", job);
        assert!(debug.contains("ComputeJob"));
        assert!(debug.contains("cancelled: false"));
    }
}
