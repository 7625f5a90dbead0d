//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and service
//! creation to reduce duplication across command handlers.

use crate::error::CliError;
use offload::config::ConfigFile;
use offload::logging::{init_logging_full, LoggingGuard};
use offload::service::{DaemonConfig, OffloadService};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// When stdout is a TTY, stdout logging is disabled so log lines don't
    /// interleave with command output.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load().map_err(CliError::Config)?;

        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging_full(&config.logging.file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("offload v{}", offload::VERSION);
        info!("offload CLI: {} command", command);
    }

    /// Start an offload service configured from the loaded config file.
    pub fn start_service(&self) -> OffloadService {
        OffloadService::start(DaemonConfig::from(&self.config))
    }
}
