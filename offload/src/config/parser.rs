//! INI parsing for the configuration file.
//!
//! Unknown sections and keys are ignored so older binaries tolerate newer
//! config files; present values are validated individually and rejected
//! with a precise error naming the offending `section.key`.

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use ini::Ini;
use std::path::PathBuf;

/// Parses a loaded INI document into a [`ConfigFile`].
///
/// Missing sections and keys fall back to defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("dispatcher")) {
        if let Some(value) = section.get("max_input") {
            config.dispatcher.max_input = parse_u64("dispatcher", "max_input", value)?;
        }
        if let Some(value) = section.get("timeout_secs") {
            config.dispatcher.timeout_secs =
                parse_nonzero_u64("dispatcher", "timeout_secs", value)?;
        }
        if let Some(value) = section.get("join_grace_secs") {
            config.dispatcher.join_grace_secs =
                parse_nonzero_u64("dispatcher", "join_grace_secs", value)?;
        }
    }

    if let Some(section) = ini.section(Some("daemon")) {
        if let Some(value) = section.get("request_channel_capacity") {
            let capacity =
                parse_nonzero_u64("daemon", "request_channel_capacity", value)? as usize;
            config.daemon.request_channel_capacity = capacity;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(value) = section.get("file") {
            config.logging.file = PathBuf::from(value);
        }
    }

    Ok(config)
}

/// Parses a non-negative integer value.
fn parse_u64(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a non-negative integer".to_string(),
        })
}

/// Parses an integer value that must be at least 1.
fn parse_nonzero_u64(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    let parsed = parse_u64(section, key, value)?;
    if parsed == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ini_from(text: &str) -> Ini {
        Ini::load_from_str(text).expect("test ini should parse")
    }

    #[test]
    fn test_empty_ini_yields_defaults() {
        let config = parse_ini(&ini_from("")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_full_ini_parses() {
        let config = parse_ini(&ini_from(
            "[dispatcher]\n\
             max_input = 45\n\
             timeout_secs = 10\n\
             join_grace_secs = 2\n\
             \n\
             [daemon]\n\
             request_channel_capacity = 64\n\
             \n\
             [logging]\n\
             file = /tmp/offload-test.log\n",
        ))
        .unwrap();

        assert_eq!(config.dispatcher.max_input, 45);
        assert_eq!(config.dispatcher.timeout_secs, 10);
        assert_eq!(config.dispatcher.join_grace_secs, 2);
        assert_eq!(config.daemon.request_channel_capacity, 64);
        assert_eq!(config.logging.file, PathBuf::from("/tmp/offload-test.log"));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_ini(&ini_from("[dispatcher]\nmax_input = 30\n")).unwrap();
        assert_eq!(config.dispatcher.max_input, 30);
        assert_eq!(
            config.dispatcher.timeout_secs,
            super::super::defaults::DEFAULT_TIMEOUT_SECS
        );
        assert_eq!(config.daemon, Default::default());
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let err = parse_ini(&ini_from("[dispatcher]\nmax_input = lots\n")).unwrap_err();
        match err {
            ConfigFileError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "dispatcher");
                assert_eq!(key, "max_input");
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_ini(&ini_from("[dispatcher]\ntimeout_secs = 0\n")).unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = parse_ini(&ini_from("[daemon]\nrequest_channel_capacity = 0\n")).unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_ini(&ini_from("[dispatcher]\nshiny_new_knob = 7\n")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
