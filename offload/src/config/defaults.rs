//! Default values and well-known paths for configuration.

use std::path::PathBuf;

/// Config directory name under the user's home directory.
pub const CONFIG_DIR_NAME: &str = ".offload";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default upper bound on request inputs (kernel overflow bound).
pub const DEFAULT_MAX_INPUT: u64 = crate::kernel::MAX_COMPUTABLE_INPUT;

/// Default isolated-computation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default join grace period in seconds.
pub const DEFAULT_JOIN_GRACE_SECS: u64 = 5;

/// Default daemon request channel capacity.
pub const DEFAULT_REQUEST_CHANNEL_CAPACITY: usize = 256;

/// Default log file name.
pub const DEFAULT_LOG_FILE_NAME: &str = "offload.log";

/// Returns the user's config directory (`~/.offload`).
///
/// Falls back to the current directory when no home directory can be
/// determined (e.g. stripped-down containers).
pub fn config_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(CONFIG_DIR_NAME),
        None => PathBuf::from(CONFIG_DIR_NAME),
    }
}

/// Returns the path of the config file (`~/.offload/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Returns the default log file path (`~/.offload/logs/offload.log`).
pub fn default_log_file() -> PathBuf {
    config_dir().join("logs").join(DEFAULT_LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_path_ends_with_ini() {
        let path = config_file_path();
        assert!(path.ends_with(format!("{}/{}", CONFIG_DIR_NAME, CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_default_log_file_under_config_dir() {
        let path = default_log_file();
        assert!(path.starts_with(config_dir()));
        assert!(path.ends_with(format!("logs/{}", DEFAULT_LOG_FILE_NAME)));
    }
}
