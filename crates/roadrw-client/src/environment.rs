//! Named deployment targets the client can point at

use serde::Serialize;
use tracing::warn;

use crate::storage::{KeyValueStore, keys};

pub const DEVELOPMENT: &str = "development";
pub const STAGING: &str = "staging";
pub const PRODUCTION: &str = "production";

pub const DEFAULT_ENVIRONMENT: &str = DEVELOPMENT;

/// One named deployment target
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentProfile {
    pub key: &'static str,
    pub display_name: &'static str,
    pub base_url: &'static str,
    pub api_path_prefix: &'static str,
    /// Presentation only
    pub accent_color: &'static str,
}

impl EnvironmentProfile {
    /// Base URL plus API prefix, the value the request client is built with.
    pub fn api_base_url(&self) -> String {
        format!("{}{}", self.base_url, self.api_path_prefix)
    }
}

const PROFILES: &[EnvironmentProfile] = &[
    EnvironmentProfile {
        key: DEVELOPMENT,
        display_name: "Desenvolvimento",
        base_url: "http://localhost:3001",
        api_path_prefix: "/api",
        accent_color: "#aacb55",
    },
    EnvironmentProfile {
        key: STAGING,
        display_name: "Homologação",
        base_url: "https://staging-api.roadrw.com",
        api_path_prefix: "/api",
        accent_color: "#7ab467",
    },
    EnvironmentProfile {
        key: PRODUCTION,
        display_name: "Produção",
        base_url: "https://api.roadrw.com",
        api_path_prefix: "/api",
        accent_color: "#045c53",
    },
];

pub fn profiles() -> &'static [EnvironmentProfile] {
    PROFILES
}

pub fn find_profile(key: &str) -> Option<&'static EnvironmentProfile> {
    PROFILES.iter().find(|p| p.key == key)
}

pub fn default_profile() -> &'static EnvironmentProfile {
    // PROFILES always contains DEFAULT_ENVIRONMENT
    &PROFILES[0]
}

/// API path prefix for an environment key, `/api` when the key is unknown.
pub fn api_prefix_for(key: &str) -> &'static str {
    find_profile(key)
        .unwrap_or_else(default_profile)
        .api_path_prefix
}

/// Reads the persisted profile selection. Unknown or unreadable values fall
/// back to the default profile.
pub fn stored_environment(store: &dyn KeyValueStore) -> &'static EnvironmentProfile {
    match store.get(keys::SELECTED_ENVIRONMENT) {
        Ok(Some(key)) => find_profile(&key).unwrap_or_else(|| {
            warn!(environment = %key, "Stored environment is unknown, using default");
            default_profile()
        }),
        Ok(None) => default_profile(),
        Err(e) => {
            warn!("Failed to read stored environment: {}", e);
            default_profile()
        }
    }
}

/// Persists the profile selection. Write failures are logged, not returned.
pub fn store_environment(store: &dyn KeyValueStore, profile: &EnvironmentProfile) {
    if let Err(e) = store
        .set(keys::SELECTED_ENVIRONMENT, profile.key)
        .and_then(|_| store.set(keys::SELECTED_BASE_URL, profile.base_url))
    {
        warn!(environment = profile.key, "Failed to save environment: {}", e);
    }
}
