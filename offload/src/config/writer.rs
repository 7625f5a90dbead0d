//! Serialization of configuration back to INI text.

use super::settings::ConfigFile;

/// Renders a [`ConfigFile`] as commented INI text.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        "# offload configuration\n\
         \n\
         [dispatcher]\n\
         # Largest accepted input (fib(94) overflows u64).\n\
         max_input = {}\n\
         # Timeout for isolated computations, in seconds.\n\
         timeout_secs = {}\n\
         # Grace period for a cancelled execution unit to exit, in seconds.\n\
         join_grace_secs = {}\n\
         \n\
         [daemon]\n\
         # Queued requests before submitters block.\n\
         request_channel_capacity = {}\n\
         \n\
         [logging]\n\
         # Log file path.\n\
         file = {}\n",
        config.dispatcher.max_input,
        config.dispatcher.timeout_secs,
        config.dispatcher.join_grace_secs,
        config.daemon.request_channel_capacity,
        config.logging.file.display(),
    )
}
