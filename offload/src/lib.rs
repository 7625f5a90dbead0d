//! offload - compute-offload dispatcher for CPU-bound work
//!
//! This library computes a deliberately expensive function (naive
//! recursive Fibonacci) either inline - blocking the request-handling
//! context - or on an isolated execution unit with its own OS thread,
//! supervised through one-shot result/fault/exit signals to exactly one
//! outcome per request.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use offload::service::{DaemonConfig, OffloadService};
//!
//! let service = OffloadService::start(DaemonConfig::default());
//!
//! let response = service.compute_isolated(30).await?;
//! println!("fibonacci(30) = {}", response.outcome);
//! ```
//!
//! Embedders that want the offload contract without the daemon can use
//! [`dispatcher::Dispatcher`] directly.

pub mod config;
pub mod dispatcher;
pub mod kernel;
pub mod logging;
pub mod service;

/// Version of the offload library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_kernel_module_exists() {
        assert_eq!(kernel::fib(10), 55);
    }
}
