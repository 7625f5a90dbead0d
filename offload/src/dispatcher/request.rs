//! Request and outcome types for the dispatcher.
//!
//! A [`ComputeRequest`] pairs an input value with an execution mode. The
//! dispatcher resolves exactly one [`Outcome`] per request, regardless of
//! mode and regardless of how many terminal signals the underlying
//! execution unit emits.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Execution Mode
// =============================================================================

/// How a computation is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecMode {
    /// Compute directly on the request-handling context.
    ///
    /// Blocks that context for the full duration of the kernel. This mode
    /// exists to demonstrate the contrast with isolated execution and is
    /// kept intentionally blocking.
    Inline,

    /// Delegate the computation to an isolated execution unit.
    ///
    /// The dispatching context stays free to serve other requests while
    /// awaiting the unit's terminal signal.
    Isolated,
}

impl ExecMode {
    /// Returns true if this mode runs on a separate execution unit.
    pub fn is_isolated(self) -> bool {
        matches!(self, ExecMode::Isolated)
    }
}

impl std::fmt::Display for ExecMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecMode::Inline => write!(f, "inline"),
            ExecMode::Isolated => write!(f, "isolated"),
        }
    }
}

// =============================================================================
// Compute Request
// =============================================================================

/// A request for one computed value.
///
/// Immutable once created. Negative or non-integer inputs cannot be
/// expressed here (`n` is a `u64`); range validation against the configured
/// maximum happens in the dispatcher before any execution unit is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeRequest {
    /// The Fibonacci input.
    pub n: u64,

    /// Execution mode for this request.
    pub mode: ExecMode,
}

impl ComputeRequest {
    /// Creates a request that computes inline on the calling context.
    pub fn inline(n: u64) -> Self {
        Self {
            n,
            mode: ExecMode::Inline,
        }
    }

    /// Creates a request that offloads to an isolated execution unit.
    pub fn isolated(n: u64) -> Self {
        Self {
            n,
            mode: ExecMode::Isolated,
        }
    }
}

impl std::fmt::Display for ComputeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fib({}) [{}]", self.n, self.mode)
    }
}

// =============================================================================
// Failure Taxonomy
// =============================================================================

/// Why a computation failed.
///
/// All failures are local to the request that triggered them; none are
/// fatal to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// Input rejected before dispatch; no execution unit was spawned.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable rejection reason.
        reason: String,
    },

    /// The execution unit raised an internal fault before producing a
    /// result, or exited cleanly without reporting one.
    #[error("execution unit faulted: {detail}")]
    InternalFault {
        /// Captured fault description (panic payload or contract violation).
        detail: String,
    },

    /// The execution unit terminated with a non-zero status and no result.
    #[error("execution unit exited abnormally (status {code})")]
    AbnormalExit {
        /// The observed exit status.
        code: i32,
    },

    /// The computation exceeded the configured time bound.
    #[error("computation timed out after {elapsed:?}")]
    Timeout {
        /// How long the unit ran before being cancelled.
        elapsed: Duration,
    },
}

impl FailureKind {
    /// Returns true if the failure was detected before dispatch.
    ///
    /// Client-side failures never spawned an execution unit; everything
    /// else is a server-side failure of a running unit.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FailureKind::InvalidInput { .. })
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// The single success-or-failure result produced per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The kernel produced a value.
    Success(u64),

    /// The request failed; see [`FailureKind`] for why.
    Failure(FailureKind),
}

impl Outcome {
    /// Creates a successful outcome.
    pub fn success(value: u64) -> Self {
        Outcome::Success(value)
    }

    /// Creates a failed outcome.
    pub fn failure(kind: FailureKind) -> Self {
        Outcome::Failure(kind)
    }

    /// Returns true if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns the computed value, if any.
    pub fn value(&self) -> Option<u64> {
        match self {
            Outcome::Success(v) => Some(*v),
            Outcome::Failure(_) => None,
        }
    }

    /// Returns the failure kind, if any.
    pub fn failure_kind(&self) -> Option<&FailureKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(kind) => Some(kind),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success(v) => write!(f, "{}", v),
            Outcome::Failure(kind) => write!(f, "failure: {}", kind),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let inline = ComputeRequest::inline(10);
        assert_eq!(inline.n, 10);
        assert_eq!(inline.mode, ExecMode::Inline);

        let isolated = ComputeRequest::isolated(10);
        assert_eq!(isolated.n, 10);
        assert_eq!(isolated.mode, ExecMode::Isolated);
    }

    #[test]
    fn test_mode_is_isolated() {
        assert!(ExecMode::Isolated.is_isolated());
        assert!(!ExecMode::Inline.is_isolated());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(format!("{}", ExecMode::Inline), "inline");
        assert_eq!(format!("{}", ExecMode::Isolated), "isolated");
    }

    #[test]
    fn test_request_display() {
        let request = ComputeRequest::isolated(42);
        assert_eq!(format!("{}", request), "fib(42) [isolated]");
    }

    #[test]
    fn test_outcome_success() {
        let outcome = Outcome::success(55);
        assert!(outcome.is_success());
        assert_eq!(outcome.value(), Some(55));
        assert!(outcome.failure_kind().is_none());
    }

    #[test]
    fn test_outcome_failure() {
        let outcome = Outcome::failure(FailureKind::AbnormalExit { code: 3 });
        assert!(!outcome.is_success());
        assert_eq!(outcome.value(), None);
        assert_eq!(
            outcome.failure_kind(),
            Some(&FailureKind::AbnormalExit { code: 3 })
        );
    }

    #[test]
    fn test_failure_kind_client_error() {
        let invalid = FailureKind::InvalidInput {
            reason: "too large".to_string(),
        };
        assert!(invalid.is_client_error());
        assert!(!FailureKind::AbnormalExit { code: 1 }.is_client_error());
        assert!(!FailureKind::Timeout {
            elapsed: Duration::from_secs(1)
        }
        .is_client_error());
    }

    #[test]
    fn test_failure_kind_display() {
        let fault = FailureKind::InternalFault {
            detail: "boom".to_string(),
        };
        assert_eq!(format!("{}", fault), "execution unit faulted: boom");

        let exit = FailureKind::AbnormalExit { code: 7 };
        assert_eq!(
            format!("{}", exit),
            "execution unit exited abnormally (status 7)"
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(format!("{}", Outcome::success(6765)), "6765");
        let failure = Outcome::failure(FailureKind::InvalidInput {
            reason: "n must not exceed 93".to_string(),
        });
        assert_eq!(
            format!("{}", failure),
            "failure: invalid input: n must not exceed 93"
        );
    }
}
