//! Road RW Client - runtime-switchable API client for the Road RW backend
//!
//! This crate provides:
//! - Environment profiles and a validated, persisted client configuration
//! - A configuration manager that rebuilds the shared request client on change
//! - Request pipeline with bearer auth, request logging and 401 session expiry
//! - Session storage and role/permission checks over a pluggable key-value store
//! - Auth flow and per-entity services for the logistics endpoints

pub mod auth;
pub mod config;
pub mod environment;
pub mod error;
pub mod event;
pub mod http;
pub mod manager;
pub mod model;
pub mod permission;
pub mod service;
pub mod session;
pub mod storage;

// Configuration re-exports
pub use config::{ActiveClientConfig, ConfigPatch};
pub use environment::EnvironmentProfile;
pub use manager::ConfigManager;

// Transport re-exports
pub use error::{ClientError, ErrorInfo, Result, ValidationError};
pub use event::{NoopSessionEvents, SessionEvents, SessionExpired};
pub use http::HttpClient;
pub use model::*;

// Session and persistence re-exports
pub use auth::{AuthService, ChangePasswordRequest, LoginRequest};
pub use session::{SessionCredential, SessionStore, UserProfile};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

// Entity services
pub use service::{
    CarrierService, ClientService, DriverService, EntityService, InvoiceFilter, InvoiceService,
    ManifestService, OccurrenceService, ShipperService,
};
