//! Active client configuration and the partial updates applied to it

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::environment::DEFAULT_ENVIRONMENT;
use crate::error::ValidationError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30000;
pub const MIN_REQUEST_TIMEOUT_MS: u64 = 1000;

/// Configuration currently in effect for the shared request client.
///
/// Serialized with camelCase keys; this is the JSON stored under
/// `environmentConfig`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveClientConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub environment_key: String,
    pub debug_mode: bool,
    pub show_request_logs: bool,
}

impl Default for ActiveClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            environment_key: DEFAULT_ENVIRONMENT.to_string(),
            debug_mode: false,
            show_request_logs: false,
        }
    }
}

impl ActiveClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Per-request log lines need both flags.
    pub fn request_logging(&self) -> bool {
        self.debug_mode && self.show_request_logs
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url)?;
        validate_timeout(self.request_timeout_ms)
    }

    /// Returns a copy with every field present in `patch` replaced.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        let mut next = self.clone();
        if let Some(base_url) = &patch.base_url {
            next.base_url = base_url.clone();
        }
        if let Some(timeout) = patch.request_timeout_ms {
            next.request_timeout_ms = timeout;
        }
        if let Some(environment_key) = &patch.environment_key {
            next.environment_key = environment_key.clone();
        }
        if let Some(debug_mode) = patch.debug_mode {
            next.debug_mode = debug_mode;
        }
        if let Some(show_request_logs) = patch.show_request_logs {
            next.show_request_logs = show_request_logs;
        }
        next
    }

    /// Overlays a persisted JSON object on top of `self`. Missing keys keep
    /// their current value and unknown keys are ignored. Anything other than
    /// a JSON object is an error.
    pub fn overlay_json(&self, raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom(
                "persisted configuration is not a JSON object",
            ));
        }
        let patch: ConfigPatch = serde_json::from_value(value)?;
        Ok(self.merged(&patch))
    }
}

/// Any subset of the configurable fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_request_logs: Option<bool>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_environment_key(mut self, key: impl Into<String>) -> Self {
        self.environment_key = Some(key.into());
        self
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = Some(debug_mode);
        self
    }

    pub fn with_show_request_logs(mut self, show_request_logs: bool) -> Self {
        self.show_request_logs = Some(show_request_logs);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks only the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(base_url) = &self.base_url {
            validate_base_url(base_url)?;
        }
        if let Some(timeout) = self.request_timeout_ms {
            validate_timeout(timeout)?;
        }
        Ok(())
    }
}

pub fn validate_base_url(base_url: &str) -> Result<(), ValidationError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::InvalidScheme(base_url.to_string()));
    }
    match Url::parse(trimmed) {
        Ok(url) if url.host_str().is_some() => Ok(()),
        _ => Err(ValidationError::MalformedUrl(base_url.to_string())),
    }
}

pub fn validate_timeout(timeout_ms: u64) -> Result<(), ValidationError> {
    if timeout_ms < MIN_REQUEST_TIMEOUT_MS {
        return Err(ValidationError::TimeoutTooShort {
            min: MIN_REQUEST_TIMEOUT_MS,
            actual: timeout_ms,
        });
    }
    Ok(())
}
