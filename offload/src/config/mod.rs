//! User configuration.
//!
//! Configuration lives in `~/.offload/config.ini` and covers dispatcher
//! limits, daemon channel sizing, and logging output. Every key is
//! optional; missing values fall back to the defaults in
//! [`defaults`].

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    config_dir, config_file_path, default_log_file, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    DEFAULT_JOIN_GRACE_SECS, DEFAULT_LOG_FILE_NAME, DEFAULT_MAX_INPUT,
    DEFAULT_REQUEST_CHANNEL_CAPACITY, DEFAULT_TIMEOUT_SECS,
};
pub use file::ConfigFileError;
pub use settings::{ConfigFile, DaemonSettings, DispatcherSettings, LoggingSettings};
