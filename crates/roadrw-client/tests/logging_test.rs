//! Request and response log lines as seen by a subscriber
//!
//! The lines are only written when both `debug_mode` and
//! `show_request_logs` are on.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use roadrw_client::{ActiveClientConfig, ConfigManager, Envelope, MemoryStore, NoopSessionEvents};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Registry, fmt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs one GET against a mock answering `body` and returns what was logged.
async fn logged_request(
    debug_mode: bool,
    show_request_logs: bool,
    body: serde_json::Value,
) -> String {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let manager = ConfigManager::new(
        ActiveClientConfig {
            base_url: format!("{}/api", server.uri()),
            debug_mode,
            show_request_logs,
            ..Default::default()
        },
        Arc::new(MemoryStore::new()),
        Arc::new(NoopSessionEvents),
    )
    .unwrap();

    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = Registry::default().with(
        fmt::layer()
            .with_writer(move || writer.clone())
            .with_ansi(false),
    );
    let _default = tracing::subscriber::set_default(subscriber);

    manager.client().get::<Envelope>("/clientes").await.unwrap();
    capture.contents()
}

#[tokio::test]
async fn test_debug_mode_alone_logs_nothing() {
    let output = logged_request(true, false, json!({"success": true})).await;
    assert!(!output.contains("API request"));
    assert!(!output.contains("API response"));
}

#[tokio::test]
async fn test_request_logs_need_debug_mode() {
    let output = logged_request(false, true, json!({"success": true})).await;
    assert!(!output.contains("API request"));
    assert!(!output.contains("API response"));
}

#[tokio::test]
async fn test_request_and_response_logged() {
    let output = logged_request(true, true, json!({"success": true, "data": []})).await;
    assert!(output.contains("API request"));
    assert!(output.contains("method=GET"));
    assert!(output.contains("path=\"/clientes\"") || output.contains("path=/clientes"));
    assert!(output.contains("API response"));
    assert!(output.contains("status=200"));
    assert!(output.contains("success=true"));
}

#[tokio::test]
async fn test_response_success_follows_envelope() {
    let body = json!({"success": false, "message": "Sem dados"});
    let output = logged_request(true, true, body).await;
    assert!(output.contains("API response"));
    assert!(output.contains("status=200"));
    assert!(output.contains("success=false"));
}
