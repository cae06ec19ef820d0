//! Session credential state persisted through the key-value port

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::{KeyValueStore, keys};

/// Profile of the signed-in user as returned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
    /// Fields the client does not interpret, kept so a round trip through
    /// the store does not lose them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Default::default()
        }
    }
}

/// Bearer token and user profile of the current session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionCredential {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

/// Reads and writes the session through the persistence port.
///
/// Token and user are written together; a session counts as authenticated
/// only when both are present.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.read(keys::TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(keys::REFRESH_TOKEN)
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.read(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user profile is not valid JSON: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.current_user().is_some()
    }

    pub fn load(&self) -> Option<SessionCredential> {
        let token = self.token()?;
        let user = self.current_user()?;
        Some(SessionCredential {
            token,
            refresh_token: self.refresh_token(),
            user,
        })
    }

    pub fn save(&self, credential: &SessionCredential) -> Result<()> {
        let user = serde_json::to_string(&credential.user)?;
        self.store.set(keys::TOKEN, &credential.token)?;
        self.store.set(keys::USER, &user)?;
        match &credential.refresh_token {
            Some(refresh_token) => self.store.set(keys::REFRESH_TOKEN, refresh_token)?,
            None => self.store.remove(keys::REFRESH_TOKEN)?,
        }
        debug!(role = %credential.user.role, "Session stored");
        Ok(())
    }

    /// Replaces the bearer token after a refresh. The refresh token is only
    /// replaced when the backend sent a new one.
    pub fn update_token(&self, token: &str, refresh_token: Option<&str>) -> Result<()> {
        self.store.set(keys::TOKEN, token)?;
        if let Some(refresh_token) = refresh_token {
            self.store.set(keys::REFRESH_TOKEN, refresh_token)?;
        }
        Ok(())
    }

    pub fn update_user(&self, user: &UserProfile) -> Result<()> {
        let user = serde_json::to_string(user)?;
        self.store.set(keys::USER, &user)
    }

    /// Removes token, refresh token and user. Never fails; store errors are
    /// logged and the remaining keys are still attempted.
    pub fn clear(&self) {
        for key in [keys::TOKEN, keys::USER, keys::REFRESH_TOKEN] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, "Failed to clear session key: {}", e);
            }
        }
        debug!("Session cleared");
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, "Failed to read session key: {}", e);
                None
            }
        }
    }
}
