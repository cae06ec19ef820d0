//! Client model types
//!
//! This module defines the backend response envelope and the reports the
//! configuration manager hands back to callers.

use serde::{Deserialize, Serialize};

use crate::session::UserProfile;

/// Uniform response envelope of the business endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Envelope with an uninterpreted payload, what the entity services return.
pub type Envelope = ApiResponse<serde_json::Value>;

/// Pagination block of list responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Outcome of a connectivity probe. Failures are folded in, never raised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub success: bool,
    pub message: String,
    pub environment: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
}

/// Snapshot of the client state for diagnostics screens
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    pub environment: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub timeout_ms: u64,
    pub debug_mode: bool,
    pub show_logs: bool,
    pub has_token: bool,
    pub user: Option<UserProfile>,
}
