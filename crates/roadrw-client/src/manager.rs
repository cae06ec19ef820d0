//! Runtime configuration manager for the shared request client
//!
//! [`ConfigManager`] owns the active configuration and the [`HttpClient`]
//! built from it. It is created once by the composition root and handed to
//! every service that needs to talk to the backend.
//!
//! Startup sequence:
//! 1. build-time defaults (supplied by the caller)
//! 2. stored environment selection (`app.env.selected`), if any
//! 3. persisted overrides (`environmentConfig`), if any

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::{ActiveClientConfig, ConfigPatch};
use crate::environment::{self, EnvironmentProfile};
use crate::error::{Result, ValidationError};
use crate::event::{NoopSessionEvents, SessionEvents};
use crate::http::HttpClient;
use crate::model::{ApiStats, ConnectionReport};
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, keys};

pub struct ConfigManager {
    defaults: ActiveClientConfig,
    store: Arc<dyn KeyValueStore>,
    session: SessionStore,
    events: Arc<dyn SessionEvents>,
    client: RwLock<Arc<HttpClient>>,
}

impl ConfigManager {
    /// Creates a manager running on `defaults`. Nothing is read from the
    /// store; call [`ConfigManager::load_persisted_config`] for that.
    pub fn new(
        defaults: ActiveClientConfig,
        store: Arc<dyn KeyValueStore>,
        events: Arc<dyn SessionEvents>,
    ) -> Result<Self> {
        defaults.validate()?;

        let session = SessionStore::new(store.clone());
        let client = HttpClient::new(defaults.clone(), session.clone(), events.clone())?;

        Ok(Self {
            defaults,
            store,
            session,
            events,
            client: RwLock::new(Arc::new(client)),
        })
    }

    /// Manager on the built-in defaults with no session subscriber.
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::new(
            ActiveClientConfig::default(),
            store,
            Arc::new(NoopSessionEvents),
        )
    }

    /// Creates a manager and restores the persisted state.
    pub fn bootstrap(
        defaults: ActiveClientConfig,
        store: Arc<dyn KeyValueStore>,
        events: Arc<dyn SessionEvents>,
    ) -> Result<Self> {
        let manager = Self::new(defaults, store, events)?;
        manager.load_persisted_config();
        Ok(manager)
    }

    /// Snapshot of the configuration in effect.
    pub fn get_config(&self) -> ActiveClientConfig {
        self.client.read().config().clone()
    }

    /// The client requests should be sent through right now. Holding on to
    /// the returned handle pins that configuration for the caller.
    pub fn client(&self) -> Arc<HttpClient> {
        self.client.read().clone()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn defaults(&self) -> &ActiveClientConfig {
        &self.defaults
    }

    /// Merges `patch` into the active configuration, rebuilds the client and
    /// persists the result. Invalid input is rejected before anything changes.
    pub fn update_config(&self, patch: ConfigPatch) -> Result<()> {
        patch.validate()?;

        let next = self.get_config().merged(&patch);
        next.validate()?;

        self.apply(next.clone())?;
        self.persist(&next);

        if next.debug_mode {
            info!(
                environment = %next.environment_key,
                base_url = %next.base_url,
                timeout_ms = next.request_timeout_ms,
                show_request_logs = next.show_request_logs,
                "Environment configuration updated"
            );
        }
        Ok(())
    }

    /// Drops every persisted override and returns to the build-time defaults.
    pub fn reset_config(&self) -> Result<()> {
        for key in [
            keys::ENVIRONMENT_CONFIG,
            keys::SELECTED_ENVIRONMENT,
            keys::SELECTED_BASE_URL,
        ] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, "Failed to remove persisted configuration: {}", e);
            }
        }

        self.apply(self.defaults.clone())?;

        if self.defaults.debug_mode {
            info!("Environment configuration reset to defaults");
        }
        Ok(())
    }

    /// Restores persisted overrides on top of the defaults. Absent, malformed
    /// or invalid data leaves the defaults in place; never fails.
    pub fn load_persisted_config(&self) {
        let baseline = self.baseline();

        let config = match self.store.get(keys::ENVIRONMENT_CONFIG) {
            Ok(Some(raw)) => match baseline.overlay_json(&raw) {
                Ok(config) => match config.validate() {
                    Ok(()) => config,
                    Err(e) => {
                        warn!("Ignoring invalid saved configuration: {}", e);
                        baseline
                    }
                },
                Err(e) => {
                    warn!("Failed to parse saved configuration: {}", e);
                    baseline
                }
            },
            Ok(None) => baseline,
            Err(e) => {
                warn!("Failed to load saved configuration: {}", e);
                baseline
            }
        };

        if let Err(e) = self.apply(config) {
            warn!("Failed to rebuild client from saved configuration: {}", e);
        }
    }

    /// Points the client at one of the static profiles and remembers the
    /// selection.
    pub fn select_environment(&self, key: &str) -> Result<&'static EnvironmentProfile> {
        let profile = environment::find_profile(key)
            .ok_or_else(|| ValidationError::UnknownEnvironment(key.to_string()))?;

        self.update_config(
            ConfigPatch::new()
                .with_base_url(profile.api_base_url())
                .with_environment_key(profile.key),
        )?;
        environment::store_environment(self.store.as_ref(), profile);

        info!(environment = profile.key, "Environment changed to {}", profile.display_name);
        Ok(profile)
    }

    /// Probes the backend health endpoint. Every failure is folded into the
    /// report.
    pub async fn test_connection(&self) -> ConnectionReport {
        let client = self.client();
        let config = client.config();
        let api_prefix = environment::api_prefix_for(&config.environment_key);

        match client.check_health(api_prefix).await {
            Ok(_) => ConnectionReport {
                success: true,
                message: "API connection established".to_string(),
                environment: config.environment_key.clone(),
                base_url: config.base_url.clone(),
            },
            Err(e) => ConnectionReport {
                success: false,
                message: format!("Connection error: {}", e),
                environment: config.environment_key.clone(),
                base_url: config.base_url.clone(),
            },
        }
    }

    pub fn api_stats(&self) -> ApiStats {
        let config = self.get_config();
        ApiStats {
            environment: config.environment_key,
            base_url: config.base_url,
            timeout_ms: config.request_timeout_ms,
            debug_mode: config.debug_mode,
            show_logs: config.show_request_logs,
            has_token: self.session.token().is_some(),
            user: self.session.current_user(),
        }
    }

    /// Defaults, moved to the stored environment profile when one was
    /// explicitly selected.
    fn baseline(&self) -> ActiveClientConfig {
        match self.store.get(keys::SELECTED_ENVIRONMENT) {
            Ok(Some(_)) => {
                let profile = environment::stored_environment(self.store.as_ref());
                self.defaults.merged(
                    &ConfigPatch::new()
                        .with_base_url(profile.api_base_url())
                        .with_environment_key(profile.key),
                )
            }
            _ => self.defaults.clone(),
        }
    }

    /// Builds a client for `config` and swaps it in. The previous client
    /// stays active if the build fails.
    fn apply(&self, config: ActiveClientConfig) -> Result<()> {
        let client = HttpClient::new(config, self.session.clone(), self.events.clone())?;
        *self.client.write() = Arc::new(client);
        debug!("Request client rebuilt");
        Ok(())
    }

    fn persist(&self, config: &ActiveClientConfig) {
        let result = serde_json::to_string(config)
            .map_err(Into::into)
            .and_then(|raw| self.store.set(keys::ENVIRONMENT_CONFIG, &raw));
        if let Err(e) = result {
            warn!("Failed to persist environment configuration: {}", e);
        }
    }
}
