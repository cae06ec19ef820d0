//! Startup settings for the command-line client
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. the settings file (`conf/roadrw.toml`, optional)
//! 3. `ROADRW_*` environment variables
//! 4. command line overrides

use std::path::PathBuf;

use anyhow::Context;
use config::{Config, Environment, File};
use roadrw_client::ActiveClientConfig;
use serde::Deserialize;

use crate::cli::GlobalArgs;

pub const DEFAULT_SETTINGS_FILE: &str = "conf/roadrw";
pub const ENV_PREFIX: &str = "ROADRW";

/// Build-time defaults of the client plus where its state lives.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub api_timeout: u64,
    pub app_env: String,
    pub debug_mode: bool,
    pub show_logs: bool,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = ActiveClientConfig::default();
        Self {
            api_base_url: defaults.base_url,
            api_timeout: defaults.request_timeout_ms,
            app_env: defaults.environment_key,
            debug_mode: defaults.debug_mode,
            show_logs: defaults.show_request_logs,
            data_dir: default_data_dir(),
        }
    }
}

impl Settings {
    pub fn load(args: &GlobalArgs) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        if let Some(data_dir) = &args.data_dir {
            builder = builder.set_override("data_dir", data_dir.to_string_lossy().to_string())?;
        }
        if let Some(app_env) = &args.app_env {
            builder = builder.set_override("app_env", app_env.as_str())?;
        }
        if let Some(api_base_url) = &args.api_base_url {
            builder = builder.set_override("api_base_url", api_base_url.as_str())?;
        }

        builder
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| format!("Failed to load settings from {}", args.config))
    }

    /// Defaults handed to the configuration manager. Validated there.
    pub fn client_defaults(&self) -> ActiveClientConfig {
        ActiveClientConfig {
            base_url: self.api_base_url.clone(),
            request_timeout_ms: self.api_timeout,
            environment_key: self.app_env.clone(),
            debug_mode: self.debug_mode,
            show_request_logs: self.show_logs,
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".roadrw")
}
