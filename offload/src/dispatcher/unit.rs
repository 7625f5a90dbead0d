//! Isolated execution units.
//!
//! An [`ExecutionUnit`] is one OS thread spawned to run a single payload
//! for a single request. It communicates with the dispatcher only via
//! message passing: a stream of [`UnitSignal`]s on an unbounded channel
//! (unbounded because the sending side is a plain thread with no async
//! context to await backpressure in).
//!
//! # Signal protocol
//!
//! ```text
//!              ┌──────────────────────────────────────────────┐
//!              │             ExecutionUnit thread             │
//!              │                                              │
//!   spawn ───► │  Started ─► payload.run(ctx) ─┬─► Exited(c)  │
//!              │                  │            │              │
//!              │          ctx.post_result(v)   │ panic        │
//!              │                  │            ▼              │
//!              │              Result(v)      Fault(msg)       │
//!              │                             Exited(101)      │
//!              └──────────────────────────────────────────────┘
//! ```
//!
//! A well-behaved payload posts at most one result and then returns its
//! exit status; the `Exited` signal always fires last and the channel
//! closes when the thread terminates. The dispatcher maps the first
//! relevant signal to the request's outcome (see `dispatcher::core`).

use super::state::UnitState;
use crate::kernel;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Exit status of a payload that ran to completion.
pub const EXIT_OK: i32 = 0;

/// Exit status reported when the payload panicked.
///
/// Matches the status a panicking Rust process exits with.
pub const EXIT_FAULT: i32 = 101;

/// Exit status of a payload that observed cancellation and stopped early.
pub const EXIT_CANCELLED: i32 = 130;

/// Counter for unique unit identifiers.
static UNIT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

// =============================================================================
// Unit Signals
// =============================================================================

/// A signal reported by an execution unit to its dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitSignal {
    /// The unit has begun evaluating its payload.
    Started,

    /// The payload produced a value (at most one per unit).
    Result(u64),

    /// The payload panicked before returning; carries the panic message.
    Fault(String),

    /// The unit's run function terminated with the given status.
    Exited(i32),
}

// =============================================================================
// Unit Context
// =============================================================================

/// Execution context handed to a payload while it runs.
///
/// Provides cancellation observation and at-most-once result posting.
pub struct UnitContext {
    cancellation: CancellationToken,
    result_tx: Option<mpsc::UnboundedSender<UnitSignal>>,
}

impl UnitContext {
    fn new(cancellation: CancellationToken, result_tx: mpsc::UnboundedSender<UnitSignal>) -> Self {
        Self {
            cancellation,
            result_tx: Some(result_tx),
        }
    }

    /// Returns true once the dispatcher has cancelled this unit.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Returns the unit's cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Posts the computed value back to the dispatcher.
    ///
    /// Only the first call has any effect; further calls are discarded.
    /// Returns true if the result was posted.
    pub fn post_result(&mut self, value: u64) -> bool {
        match self.result_tx.take() {
            Some(tx) => {
                let _ = tx.send(UnitSignal::Result(value));
                true
            }
            None => {
                debug!(value, "Result already posted, discarding");
                false
            }
        }
    }
}

// =============================================================================
// Unit Payload
// =============================================================================

/// The work an execution unit runs.
///
/// `run` is the unit's entire life: it may post at most one result through
/// the context and must return an exit status. A panic inside `run` is
/// captured at the unit boundary and reported as a fault signal.
pub trait UnitPayload: Send + 'static {
    /// Short payload name for logging and thread naming.
    fn name(&self) -> &str;

    /// Runs the payload to completion, returning its exit status.
    fn run(&self, ctx: &mut UnitContext) -> i32;
}

/// Payload that evaluates the Fibonacci kernel for one input.
///
/// Uses the interruptible kernel walker so the unit can stop promptly when
/// the dispatcher cancels it (timeout or shutdown).
pub struct FibPayload {
    n: u64,
}

impl FibPayload {
    /// Creates a payload bound to the given input.
    pub fn new(n: u64) -> Self {
        Self { n }
    }
}

impl UnitPayload for FibPayload {
    fn name(&self) -> &str {
        "fibonacci"
    }

    fn run(&self, ctx: &mut UnitContext) -> i32 {
        let token = ctx.cancellation().clone();
        match kernel::fib_interruptible(self.n, &|| token.is_cancelled()) {
            Some(value) => {
                ctx.post_result(value);
                EXIT_OK
            }
            None => EXIT_CANCELLED,
        }
    }
}

// =============================================================================
// Execution Unit
// =============================================================================

/// One isolated runner of one payload.
///
/// Owned exclusively by the dispatcher invocation that spawned it; never
/// shared or reused across requests. The dispatcher consumes the signal
/// stream, transitions the lifecycle state, and joins the thread once the
/// unit has exited.
pub struct ExecutionUnit {
    id: u64,
    payload_name: String,
    state: UnitState,
    signal_rx: mpsc::UnboundedReceiver<UnitSignal>,
    cancellation: CancellationToken,
    thread: Option<JoinHandle<()>>,
    spawned_at: Instant,
}

impl ExecutionUnit {
    /// Spawns a new unit running the given payload on its own OS thread.
    ///
    /// The unit starts in [`UnitState::Created`]; it reports
    /// [`UnitSignal::Started`] once the thread begins evaluating.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the OS refuses to spawn a
    /// thread.
    pub fn spawn(payload: impl UnitPayload) -> std::io::Result<Self> {
        Self::spawn_boxed(Box::new(payload))
    }

    /// Spawns a new unit from a boxed payload.
    pub fn spawn_boxed(payload: Box<dyn UnitPayload>) -> std::io::Result<Self> {
        let id = UNIT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let payload_name = payload.name().to_string();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let cancellation = CancellationToken::new();
        let unit_token = cancellation.clone();

        let thread = std::thread::Builder::new()
            .name(format!("unit-{}-{}", id, payload_name))
            .spawn(move || unit_main(payload, unit_token, signal_tx))?;

        debug!(unit_id = id, payload = %payload_name, "Execution unit spawned");

        Ok(Self {
            id,
            payload_name,
            state: UnitState::Created,
            signal_rx,
            cancellation,
            thread: Some(thread),
            spawned_at: Instant::now(),
        })
    }

    /// Returns the unit's unique identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the payload name.
    pub fn payload_name(&self) -> &str {
        &self.payload_name
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Transitions the lifecycle state.
    ///
    /// Terminal states are sticky: once terminal, further transitions are
    /// ignored (the resolving event has already been observed).
    pub fn set_state(&mut self, state: UnitState) {
        if self.state.is_terminal() {
            debug!(
                unit_id = self.id,
                current = %self.state,
                ignored = %state,
                "Unit already terminal, ignoring state transition"
            );
            return;
        }
        self.state = state;
    }

    /// Time since the unit was spawned.
    pub fn elapsed(&self) -> std::time::Duration {
        self.spawned_at.elapsed()
    }

    /// Requests cooperative cancellation of the payload.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Receives the next signal from the unit.
    ///
    /// Returns `None` once the unit thread has terminated and all signals
    /// have been consumed.
    pub async fn next_signal(&mut self) -> Option<UnitSignal> {
        self.signal_rx.recv().await
    }

    /// Joins the unit's thread.
    ///
    /// Call only after the `Exited` signal was observed or the signal
    /// channel closed - at that point the thread is terminating and the
    /// join is effectively immediate.
    pub fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                // unit_main catches payload panics, so this is unexpected
                error!(unit_id = self.id, "Execution unit thread join failed");
            }
        }
    }

    /// Abandons the unit's thread without joining.
    ///
    /// Last resort for a unit that ignored cancellation past the grace
    /// period. The thread keeps running detached until its payload returns.
    pub fn abandon(&mut self) {
        if self.thread.take().is_some() {
            warn!(
                unit_id = self.id,
                payload = %self.payload_name,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Abandoning execution unit that ignored cancellation"
            );
        }
    }
}

impl std::fmt::Debug for ExecutionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionUnit")
            .field("id", &self.id)
            .field("payload", &self.payload_name)
            .field("state", &self.state)
            .finish()
    }
}

// =============================================================================
// Unit thread main
// =============================================================================

/// Entry point of the unit's thread.
///
/// Reports `Started`, runs the payload under a panic boundary, and always
/// reports a final `Exited` signal. Send failures are ignored: a dropped
/// receiver means the dispatcher has already released the unit.
fn unit_main(
    payload: Box<dyn UnitPayload>,
    cancellation: CancellationToken,
    signal_tx: mpsc::UnboundedSender<UnitSignal>,
) {
    let _ = signal_tx.send(UnitSignal::Started);

    let mut ctx = UnitContext::new(cancellation, signal_tx.clone());
    match catch_unwind(AssertUnwindSafe(|| payload.run(&mut ctx))) {
        Ok(status) => {
            let _ = signal_tx.send(UnitSignal::Exited(status));
        }
        Err(panic) => {
            let _ = signal_tx.send(UnitSignal::Fault(panic_message(&panic)));
            let _ = signal_tx.send(UnitSignal::Exited(EXIT_FAULT));
        }
    }
}

/// Extracts a printable message from a panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
