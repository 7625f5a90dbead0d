//! Dispatcher core - mode selection and unit supervision.
//!
//! [`Dispatcher::submit`] is the single public operation: validate the
//! request, then either compute inline on the calling context or spawn an
//! execution unit and supervise it to exactly one outcome.
//!
//! # Isolated-path supervision
//!
//! ```text
//!  submit ──► validate ──► spawn unit ──► consume signal stream
//!                                              │
//!                 Result(v) ── first wins ──► Success(v)
//!                 Fault(msg) ─ first wins ──► Failure(InternalFault)
//!                 Exited(c≠0), unresolved ──► Failure(AbnormalExit(c))
//!                 Exited(0), unresolved ────► Failure(InternalFault)
//!                 deadline expired ─────────► Failure(Timeout), cancel unit
//!                                              │
//!                                  drain remaining signals, join thread
//! ```
//!
//! Resolution is idempotent via [`OutcomeSlot`]: whichever terminal signal
//! arrives first determines the outcome, and every later signal is fed
//! through the slot so it is discarded and counted, never double-reported.

use super::config::DispatcherConfig;
use super::request::{ComputeRequest, ExecMode, FailureKind, Outcome};
use super::resolver::OutcomeSlot;
use super::state::UnitState;
use super::unit::{ExecutionUnit, FibPayload, UnitPayload, UnitSignal};
use crate::kernel;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The offload dispatcher.
///
/// Stateless apart from its configuration: each submitted request owns its
/// execution unit exclusively, so a single dispatcher can drive any number
/// of concurrent requests without shared state between them.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Creates a dispatcher with the given configuration.
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config }
    }

    /// Returns the dispatcher's configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Submits a request and resolves exactly one outcome for it.
    ///
    /// Inline requests block the calling context for the full computation;
    /// isolated requests suspend only this call's continuation while the
    /// execution unit runs on its own thread.
    pub async fn submit(&self, request: ComputeRequest) -> Outcome {
        if let Err(kind) = self.validate(&request) {
            warn!(request = %request, reason = %kind, "Request rejected before dispatch");
            return Outcome::failure(kind);
        }

        debug!(request = %request, "Request accepted");

        match request.mode {
            ExecMode::Inline => self.compute_inline(request.n),
            ExecMode::Isolated => self.compute_isolated(request.n).await,
        }
    }

    /// Validates a request against the configured input bound.
    ///
    /// Rejected requests never reach the kernel and never spawn a unit.
    fn validate(&self, request: &ComputeRequest) -> Result<(), FailureKind> {
        if request.n > self.config.max_input {
            return Err(FailureKind::InvalidInput {
                reason: format!(
                    "n must not exceed {}, got {}",
                    self.config.max_input, request.n
                ),
            });
        }
        Ok(())
    }

    /// Computes on the calling context, blocking it until done.
    fn compute_inline(&self, n: u64) -> Outcome {
        let started = Instant::now();
        let value = kernel::fib(n);

        info!(
            n,
            value,
            duration_ms = started.elapsed().as_millis() as u64,
            "Inline computation finished"
        );
        Outcome::success(value)
    }

    /// Offloads the kernel to a fresh execution unit.
    async fn compute_isolated(&self, n: u64) -> Outcome {
        self.execute_payload(FibPayload::new(n)).await
    }

    /// Spawns a unit for the given payload and supervises it to an outcome.
    ///
    /// Public seam for exercising the supervision logic with payloads other
    /// than the kernel (and for embedding other CPU-bound work).
    pub async fn execute_payload(&self, payload: impl UnitPayload) -> Outcome {
        let unit = match ExecutionUnit::spawn(payload) {
            Ok(unit) => unit,
            Err(e) => {
                error!(error = %e, "Failed to spawn execution unit");
                return Outcome::failure(FailureKind::InternalFault {
                    detail: format!("failed to spawn execution unit: {}", e),
                });
            }
        };
        self.supervise(unit).await
    }

    /// Consumes a unit's signal stream until the outcome is resolved, then
    /// tears the unit down.
    async fn supervise(&self, mut unit: ExecutionUnit) -> Outcome {
        let mut slot = OutcomeSlot::new();
        let deadline = tokio::time::Instant::now() + self.config.timeout;
        let mut exited = false;

        while !slot.is_resolved() {
            tokio::select! {
                signal = unit.next_signal() => match signal {
                    Some(UnitSignal::Started) => {
                        unit.set_state(UnitState::Running);
                    }
                    Some(UnitSignal::Result(value)) => {
                        slot.resolve(Outcome::success(value));
                        unit.set_state(UnitState::Completed);
                        info!(
                            unit_id = unit.id(),
                            value,
                            duration_ms = unit.elapsed().as_millis() as u64,
                            "Execution unit completed"
                        );
                    }
                    Some(UnitSignal::Fault(detail)) => {
                        slot.resolve(Outcome::failure(FailureKind::InternalFault {
                            detail: detail.clone(),
                        }));
                        unit.set_state(UnitState::Faulted);
                        error!(unit_id = unit.id(), detail = %detail, "Execution unit faulted");
                    }
                    Some(UnitSignal::Exited(code)) => {
                        exited = true;
                        self.resolve_exit(&mut unit, &mut slot, code);
                    }
                    None => {
                        // unit_main always sends Exited before the channel
                        // closes, so this is a contract violation.
                        exited = true;
                        slot.resolve(Outcome::failure(FailureKind::InternalFault {
                            detail: "execution unit vanished without an exit signal".to_string(),
                        }));
                        unit.set_state(UnitState::Faulted);
                        error!(unit_id = unit.id(), "Signal channel closed without exit");
                    }
                },
                _ = tokio::time::sleep_until(deadline) => {
                    let elapsed = unit.elapsed();
                    warn!(
                        unit_id = unit.id(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        timeout_ms = self.config.timeout.as_millis() as u64,
                        "Execution unit timed out, cancelling"
                    );
                    unit.cancel();
                    unit.set_state(UnitState::TimedOut);
                    slot.resolve(Outcome::failure(FailureKind::Timeout { elapsed }));
                }
            }
        }

        self.teardown(unit, &mut slot, exited).await;

        // Resolved on every loop exit; the fallback is defensive.
        slot.into_outcome().unwrap_or_else(|| {
            Outcome::failure(FailureKind::InternalFault {
                detail: "request ended without a resolved outcome".to_string(),
            })
        })
    }

    /// Maps an exit signal onto an unresolved slot.
    fn resolve_exit(&self, unit: &mut ExecutionUnit, slot: &mut OutcomeSlot, code: i32) {
        if code != 0 {
            slot.resolve(Outcome::failure(FailureKind::AbnormalExit { code }));
            unit.set_state(UnitState::ExitedAbnormally);
            error!(unit_id = unit.id(), code, "Execution unit exited abnormally");
        } else {
            // A clean exit with no prior result violates the unit contract;
            // a server-side failure beats leaving the request pending forever.
            slot.resolve(Outcome::failure(FailureKind::InternalFault {
                detail: "execution unit exited cleanly without reporting a result".to_string(),
            }));
            unit.set_state(UnitState::Faulted);
            error!(unit_id = unit.id(), "Execution unit exited without a result");
        }
    }

    /// Releases the unit after resolution.
    ///
    /// If the exit signal was already observed, the join is immediate.
    /// Otherwise the unit gets the configured grace period to finish
    /// (late terminal signals are fed through the slot so they are
    /// discarded, not double-reported); past that it is abandoned so the
    /// dispatcher never blocks on a wedged unit.
    async fn teardown(&self, mut unit: ExecutionUnit, slot: &mut OutcomeSlot, exited: bool) {
        if exited {
            unit.join();
            return;
        }

        let drained = tokio::time::timeout(self.config.join_grace, async {
            while let Some(signal) = unit.next_signal().await {
                match signal {
                    UnitSignal::Result(value) => {
                        slot.resolve(Outcome::success(value));
                    }
                    UnitSignal::Fault(detail) => {
                        slot.resolve(Outcome::failure(FailureKind::InternalFault { detail }));
                    }
                    UnitSignal::Exited(code) if code != 0 => {
                        slot.resolve(Outcome::failure(FailureKind::AbnormalExit { code }));
                    }
                    UnitSignal::Exited(_) | UnitSignal::Started => {}
                }
            }
        })
        .await;

        match drained {
            Ok(()) => unit.join(),
            Err(_) => unit.abandon(),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}
