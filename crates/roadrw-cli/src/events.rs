//! Session notifications for a terminal user

use roadrw_client::{SessionEvents, SessionExpired};
use tracing::warn;

/// Stands in for the login redirect of the web front end.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSessionEvents;

impl SessionEvents for ConsoleSessionEvents {
    fn session_expired(&self, event: &SessionExpired) {
        warn!(
            method = %event.method,
            path = %event.path,
            environment = %event.environment,
            "Session expired"
        );
        eprintln!("Session expired, please log in again with `roadrw login`");
    }
}
