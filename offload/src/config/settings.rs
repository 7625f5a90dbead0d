//! Configuration settings structs.
//!
//! Plain data loaded from `~/.offload/config.ini`; the dispatcher and
//! daemon convert these into their own config types at startup.

use super::defaults::*;
use std::path::PathBuf;

/// Complete configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Dispatcher limits.
    pub dispatcher: DispatcherSettings,

    /// Daemon channel sizing.
    pub daemon: DaemonSettings,

    /// Logging output.
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherSettings::default(),
            daemon: DaemonSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    /// Largest accepted input value.
    /// Default: 93 (the u64 overflow bound of the kernel)
    pub max_input: u64,

    /// Timeout for isolated computations in seconds.
    /// Default: 30
    pub timeout_secs: u64,

    /// Grace period for a cancelled unit to exit, in seconds.
    /// Default: 5
    pub join_grace_secs: u64,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            max_input: DEFAULT_MAX_INPUT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            join_grace_secs: DEFAULT_JOIN_GRACE_SECS,
        }
    }
}

/// Daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonSettings {
    /// Request channel capacity (queued jobs before senders block).
    /// Default: 256
    pub request_channel_capacity: usize,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            request_channel_capacity: DEFAULT_REQUEST_CHANNEL_CAPACITY,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path.
    /// Default: ~/.offload/logs/offload.log
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}
