use crate::display::OutputFormat;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nodebot")]
#[command(about = "Command line client for the node-bot auth and config API")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Base URL of the API, e.g. http://localhost:5000/api/
    #[arg(long, global = true, env = "NODEBOT_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Session commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Remote config records
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Local client settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in and print the server response
    Login {
        /// Username; prompted for when omitted
        #[arg(long)]
        username: Option<String>,
        /// Raw JSON credentials payload, sent as-is
        #[arg(long, conflicts_with = "username")]
        credentials: Option<String>,
    },
    /// Log out and print the server response
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Fetch and print the config
    Show {
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },
    /// Create a config record
    Create {
        /// JSON payload
        #[arg(long)]
        data: String,
    },
    /// Replace a config record
    Update {
        id: String,
        /// JSON payload
        #[arg(long)]
        data: String,
    },
    /// Delete a config record
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the settings file
    Show,
    /// Set a value on the active profile (url, timeout, stale-time)
    Set { key: String, value: String },
}
