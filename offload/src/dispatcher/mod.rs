//! Compute-Offload Dispatcher
//!
//! This module provides the offload contract around the compute kernel:
//! a request names an input and an execution mode, and the dispatcher
//! resolves exactly one outcome for it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                            │
//! │  submit(request) -> Outcome                                  │
//! ├──────────────────────────┬──────────────────────────────────┤
//! │        Inline            │            Isolated               │
//! │  kernel::fib on the      │  ExecutionUnit (own OS thread)    │
//! │  calling context,        │  signal stream: started/result/   │
//! │  blocking it             │  fault/exited                     │
//! │                          │  OutcomeSlot: first signal wins   │
//! └──────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **ComputeRequest**: input value plus [`ExecMode`]; immutable.
//! - **ExecutionUnit**: one isolated OS thread per isolated request,
//!   owned exclusively by the request that spawned it, never pooled.
//! - **Outcome**: the single success-or-failure result per request.
//! - **OutcomeSlot**: idempotent resolver - the first terminal signal
//!   wins, later ones are discarded.
//!
//! # Example
//!
//! ```ignore
//! use offload::dispatcher::{ComputeRequest, Dispatcher, DispatcherConfig};
//!
//! let dispatcher = Dispatcher::new(DispatcherConfig::default());
//!
//! let outcome = dispatcher.submit(ComputeRequest::isolated(30)).await;
//! match outcome.value() {
//!     Some(v) => println!("fib(30) = {}", v),
//!     None => eprintln!("failed: {:?}", outcome.failure_kind()),
//! }
//! ```

mod config;
mod core;
mod request;
mod resolver;
mod state;
mod unit;

// Request and outcome types
pub use request::{ComputeRequest, ExecMode, FailureKind, Outcome};

// Lifecycle state
pub use state::UnitState;

// Idempotent resolution
pub use resolver::OutcomeSlot;

// Execution units
pub use unit::{
    ExecutionUnit, FibPayload, UnitContext, UnitPayload, UnitSignal, EXIT_CANCELLED, EXIT_FAULT,
    EXIT_OK,
};

// Dispatcher
pub use config::{
    DispatcherConfig, DEFAULT_JOIN_GRACE_SECS, DEFAULT_MAX_INPUT, DEFAULT_TIMEOUT_SECS,
};
pub use self::core::Dispatcher;
