//! Process startup: logging initialisation

pub mod logging;

pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
