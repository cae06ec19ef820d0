//! Request pipeline tests against a mock backend
//!
//! Covers auth attachment, the uniform error shape, 401 session expiry,
//! client swapping and the connectivity probe.

use std::sync::Arc;

use parking_lot::Mutex;
use roadrw_client::{
    ActiveClientConfig, ClientError, ConfigManager, ConfigPatch, Envelope, MemoryStore,
    SessionCredential, SessionEvents, SessionExpired, UserProfile,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE: &str = "http://127.0.0.1:1/api";

fn config_for(base_url: String) -> ActiveClientConfig {
    ActiveClientConfig {
        base_url,
        request_timeout_ms: 5000,
        ..Default::default()
    }
}

fn manager_for(base_url: String) -> ConfigManager {
    ConfigManager::new(
        config_for(base_url),
        Arc::new(MemoryStore::new()),
        Arc::new(roadrw_client::NoopSessionEvents),
    )
    .unwrap()
}

fn sign_in(manager: &ConfigManager, role: &str) {
    manager
        .session()
        .save(&SessionCredential {
            token: "abc".to_string(),
            refresh_token: Some("refresh".to_string()),
            user: UserProfile::with_role(role),
        })
        .unwrap();
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1, "nome": "Cliente A"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = manager_for(format!("{}/api", server.uri()));
    sign_in(&manager, "operador");

    let response: Envelope = manager.client().get("/clientes").await.unwrap();
    assert!(response.success);
    assert_eq!(response.data.unwrap()[0]["nome"], "Cliente A");
}

#[tokio::test]
async fn test_no_authorization_header_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let manager = manager_for(format!("{}/api", server.uri()));
    let _: Envelope = manager.client().get("/clientes").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_backend_message_preferred() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "message": "CNPJ já cadastrado"
        })))
        .mount(&server)
        .await;

    let manager = manager_for(format!("{}/api", server.uri()));
    let err = manager
        .client()
        .post_json::<Envelope, _>("/clientes", &json!({"cnpj": "1"}))
        .await
        .unwrap_err();

    let ClientError::Backend(info) = err else {
        panic!("expected a backend error");
    };
    assert_eq!(info.status, Some(422));
    assert_eq!(info.message, "CNPJ já cadastrado");
    assert_eq!(info.url, "/clientes");
    assert_eq!(info.method, "POST");
    assert_eq!(info.environment, "development");
}

#[tokio::test]
async fn test_status_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/romaneios"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let manager = manager_for(format!("{}/api", server.uri()));
    let err = manager.client().get::<Envelope>("/romaneios").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(
        err.info().unwrap().message,
        "Request failed with status code 500"
    );
}

#[tokio::test]
async fn test_transport_error_has_no_status() {
    let manager = manager_for(UNREACHABLE.to_string());
    let err = manager.client().get::<Envelope>("/clientes").await.unwrap_err();

    let ClientError::Transport(info) = err else {
        panic!("expected a transport error");
    };
    assert_eq!(info.status, None);
    assert!(!info.message.is_empty());
    assert_eq!(info.url, "/clientes");
    assert_eq!(info.method, "GET");
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/romaneios/7/finalizar"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token expirado"
        })))
        .mount(&server)
        .await;

    let seen: Arc<Mutex<Vec<SessionExpired>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let events: Arc<dyn SessionEvents> =
        Arc::new(move |event: &SessionExpired| sink.lock().push(event.clone()));

    let manager = ConfigManager::new(
        config_for(format!("{}/api", server.uri())),
        Arc::new(MemoryStore::new()),
        events,
    )
    .unwrap();
    sign_in(&manager, "gestor");
    assert!(manager.session().is_authenticated());

    let err = manager
        .client()
        .post::<Envelope>("/romaneios/7/finalizar")
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.info().unwrap().message, "Token expirado");

    let session = manager.session();
    assert!(session.token().is_none());
    assert!(session.refresh_token().is_none());
    assert!(session.current_user().is_none());

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/romaneios/7/finalizar");
    assert_eq!(seen[0].redirect_to, "/login");
}

#[tokio::test]
async fn test_next_request_uses_new_base_url() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/api/motoristas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(server)
            .await;
    }

    let manager = manager_for(format!("{}/api", first.uri()));
    let pinned = manager.client();

    manager
        .update_config(ConfigPatch::new().with_base_url(format!("{}/api", second.uri())))
        .unwrap();

    let _: Envelope = pinned.get("/motoristas").await.unwrap();
    let _: Envelope = manager.client().get("/motoristas").await.unwrap();
}

#[tokio::test]
async fn test_connection_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/api", server.uri());
    let manager = manager_for(base_url.clone());
    sign_in(&manager, "admin");

    let report = manager.test_connection().await;
    assert!(report.success);
    assert_eq!(report.message, "API connection established");
    assert_eq!(report.environment, "development");
    assert_eq!(report.base_url, base_url);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_connection_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let manager = manager_for(format!("{}/api", server.uri()));
    let report = manager.test_connection().await;
    assert!(!report.success);
    assert!(report.message.starts_with("Connection error: "));
}

#[tokio::test]
async fn test_connection_unreachable_host() {
    let manager = manager_for(UNREACHABLE.to_string());
    let report = manager.test_connection().await;

    assert!(!report.success);
    assert!(report.message.len() > "Connection error: ".len());
    assert_eq!(report.base_url, UNREACHABLE);
}
