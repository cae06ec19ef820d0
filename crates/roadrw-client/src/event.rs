//! Session lifecycle notifications emitted by the request client

/// Route the UI should navigate to once a session has expired.
pub const LOGIN_ROUTE: &str = "/login";

/// Emitted after a 401 response has cleared the stored session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionExpired {
    pub method: String,
    pub path: String,
    pub environment: String,
    pub redirect_to: &'static str,
}

/// Subscriber for session lifecycle events. The UI layer implements this to
/// perform its login redirect.
pub trait SessionEvents: Send + Sync {
    fn session_expired(&self, event: &SessionExpired);
}

/// Subscriber that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSessionEvents;

impl SessionEvents for NoopSessionEvents {
    fn session_expired(&self, _event: &SessionExpired) {}
}

impl<F> SessionEvents for F
where
    F: Fn(&SessionExpired) + Send + Sync,
{
    fn session_expired(&self, event: &SessionExpired) {
        self(event)
    }
}
