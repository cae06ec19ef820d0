//! Command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::DEFAULT_SETTINGS_FILE;

#[derive(Debug, Parser)]
#[command(name = "roadrw", version, about = "Road RW API client")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of the settings file and `ROADRW_*` variables.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Settings file; the extension may be omitted
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    pub config: String,

    /// Directory holding the persisted session and environment state
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Environment key used when nothing has been selected yet
    #[arg(long, global = true)]
    pub app_env: Option<String>,

    /// Base URL used when nothing has been persisted yet
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            config: DEFAULT_SETTINGS_FILE.to_string(),
            data_dir: None,
            app_env: None,
            api_base_url: None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and switch the API environment
    #[command(subcommand)]
    Env(EnvCommand),

    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ROADRW_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// GET a backend path through the shared client
    Get {
        /// Path relative to the API base URL, e.g. `/clientes`
        path: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// Print the active configuration
    Show,

    /// List the known environment profiles
    List,

    /// Switch to an environment profile
    Use { key: String },

    /// Change individual configuration fields
    Set {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long)]
        debug_mode: Option<bool>,
        #[arg(long)]
        show_logs: Option<bool>,
    },

    /// Drop persisted overrides and return to the defaults
    Reset,

    /// Probe the backend health endpoint
    Test,

    /// Print client diagnostics
    Stats,
}
