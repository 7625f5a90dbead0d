//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use offload::config::ConfigFileError;
use offload::dispatcher::FailureKind;
use offload::service::ServiceError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to reach the dispatch daemon
    Service(ServiceError),
    /// The computation itself failed
    Compute(FailureKind),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::Compute(FailureKind::InvalidInput { .. }) = self {
            eprintln!();
            eprintln!("The accepted input range is configurable:");
            eprintln!("  [dispatcher] max_input in ~/.offload/config.ini");
        }
        if let CliError::Compute(FailureKind::Timeout { .. }) = self {
            eprintln!();
            eprintln!("The computation exceeded the configured time bound:");
            eprintln!("  [dispatcher] timeout_secs in ~/.offload/config.ini");
        }

        process::exit(self.exit_code())
    }

    /// Exit code for this error: 2 for client-side input errors, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Compute(kind) if kind.is_client_error() => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Service(e) => write!(f, "Dispatch service error: {}", e),
            CliError::Compute(kind) => write!(f, "Computation failed: {}", kind),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Compute(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}
