//! `offload config` - configuration file management.

use crate::error::CliError;
use clap::{Args, Subcommand};
use offload::config::{config_file_path, ConfigFile};

/// Arguments for the config command.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the config file path
    Path,
    /// Create the config file with defaults if it doesn't exist
    Init,
    /// Show the effective configuration
    Show,
}

/// Runs the config command.
pub fn run(args: ConfigArgs) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigAction::Init => {
            let path = ConfigFile::ensure_exists().map_err(CliError::Config)?;
            println!("Config file: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = ConfigFile::load().map_err(CliError::Config)?;
            println!("[dispatcher]");
            println!("max_input = {}", config.dispatcher.max_input);
            println!("timeout_secs = {}", config.dispatcher.timeout_secs);
            println!("join_grace_secs = {}", config.dispatcher.join_grace_secs);
            println!();
            println!("[daemon]");
            println!(
                "request_channel_capacity = {}",
                config.daemon.request_channel_capacity
            );
            println!();
            println!("[logging]");
            println!("file = {}", config.logging.file.display());
            Ok(())
        }
    }
}
