//! Command handlers
//!
//! Each handler returns the text to print on stdout. Errors bubble up to
//! `main` and end the process with a non-zero status.

pub mod auth;
pub mod env;

use std::sync::Arc;

use anyhow::Context;
use roadrw_client::{AuthService, ConfigManager, FileStore, KeyValueStore};

use crate::cli::Command;
use crate::events::ConsoleSessionEvents;
use crate::settings::Settings;

/// Services shared by every command
pub struct AppContext {
    manager: Arc<ConfigManager>,
    auth: AuthService,
}

impl AppContext {
    /// Context over the file-backed store in the settings' data directory.
    pub fn bootstrap(settings: &Settings) -> anyhow::Result<Self> {
        let store = Arc::new(FileStore::new(settings.store_dir()));
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: &Settings, store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let manager = ConfigManager::bootstrap(
            settings.client_defaults(),
            store,
            Arc::new(ConsoleSessionEvents),
        )
        .context("Invalid client defaults")?;
        let manager = Arc::new(manager);

        Ok(Self {
            auth: AuthService::new(manager.clone()),
            manager,
        })
    }

    pub fn manager(&self) -> &ConfigManager {
        &self.manager
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}

pub async fn execute(command: Command, context: &AppContext) -> anyhow::Result<String> {
    match command {
        Command::Env(command) => env::execute(command, context).await,
        Command::Login { email, password } => auth::login(context, email, password).await,
        Command::Logout => auth::logout(context).await,
        Command::Whoami => auth::whoami(context),
        Command::Refresh => auth::refresh(context).await,
        Command::Get { path } => get(context, &path).await,
    }
}

async fn get(context: &AppContext, path: &str) -> anyhow::Result<String> {
    let body: serde_json::Value = context.manager().client().get(path).await?;
    Ok(serde_json::to_string_pretty(&body)?)
}
