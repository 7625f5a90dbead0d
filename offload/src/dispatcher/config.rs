//! Dispatcher configuration.

use crate::kernel::MAX_COMPUTABLE_INPUT;
use std::time::Duration;

// =============================================================================
// Configuration Constants
// =============================================================================

/// Default upper bound on request inputs.
///
/// Matches the kernel's u64 overflow bound; the timeout guards running
/// time for inputs below it.
pub const DEFAULT_MAX_INPUT: u64 = MAX_COMPUTABLE_INPUT;

/// Default time bound for isolated computations (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default grace period for a cancelled unit to exit before it is
/// abandoned (seconds).
pub const DEFAULT_JOIN_GRACE_SECS: u64 = 5;

// =============================================================================
// Dispatcher Configuration
// =============================================================================

/// Configuration for the offload dispatcher.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Largest accepted input; larger values resolve `InvalidInput`
    /// synchronously without spawning a unit.
    pub max_input: u64,

    /// Time bound for isolated computations. On expiry the request
    /// resolves `Timeout` and the unit is cancelled.
    pub timeout: Duration,

    /// How long to wait for a cancelled unit to exit before abandoning
    /// its thread.
    pub join_grace: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_input: DEFAULT_MAX_INPUT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            join_grace: Duration::from_secs(DEFAULT_JOIN_GRACE_SECS),
        }
    }
}

impl From<&crate::config::DispatcherSettings> for DispatcherConfig {
    fn from(settings: &crate::config::DispatcherSettings) -> Self {
        Self {
            max_input: settings.max_input,
            timeout: Duration::from_secs(settings.timeout_secs),
            join_grace: Duration::from_secs(settings.join_grace_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_config_default() {
        let config = DispatcherConfig::default();
        assert_eq!(config.max_input, DEFAULT_MAX_INPUT);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            config.join_grace,
            Duration::from_secs(DEFAULT_JOIN_GRACE_SECS)
        );
    }

    #[test]
    fn test_default_max_input_matches_kernel_bound() {
        assert_eq!(DEFAULT_MAX_INPUT, MAX_COMPUTABLE_INPUT);
    }
}
