//! Command handler tests over an in-memory store and a mock backend

use std::sync::Arc;

use roadrw_cli::{AppContext, Command, EnvCommand, Settings, execute};
use roadrw_client::MemoryStore;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_for(api_base_url: String) -> AppContext {
    let settings = Settings {
        api_base_url,
        ..Default::default()
    };
    AppContext::with_store(&settings, Arc::new(MemoryStore::new())).unwrap()
}

fn set(timeout_ms: Option<u64>) -> Command {
    Command::Env(EnvCommand::Set {
        base_url: None,
        timeout_ms,
        debug_mode: None,
        show_logs: None,
    })
}

#[tokio::test]
async fn test_env_use_and_show() {
    let context = context_for("http://localhost:3001/api".to_string());

    let output = execute(
        Command::Env(EnvCommand::Use {
            key: "staging".to_string(),
        }),
        &context,
    )
    .await
    .unwrap();
    assert_eq!(
        output,
        "Switched to Homologação (https://staging-api.roadrw.com/api)"
    );

    let shown: Value =
        serde_json::from_str(&execute(Command::Env(EnvCommand::Show), &context).await.unwrap())
            .unwrap();
    assert_eq!(shown["environmentKey"], "staging");
    assert_eq!(shown["baseUrl"], "https://staging-api.roadrw.com/api");
}

#[tokio::test]
async fn test_env_use_unknown_key_fails() {
    let context = context_for("http://localhost:3001/api".to_string());
    let result = execute(
        Command::Env(EnvCommand::Use {
            key: "mars".to_string(),
        }),
        &context,
    )
    .await;
    assert!(result.is_err());
    assert_eq!(context.manager().get_config().environment_key, "development");
}

#[tokio::test]
async fn test_env_set_validates() {
    let context = context_for("http://localhost:3001/api".to_string());

    assert!(execute(set(None), &context).await.is_err());
    assert!(execute(set(Some(500)), &context).await.is_err());
    assert_eq!(context.manager().get_config().request_timeout_ms, 30000);

    let output = execute(set(Some(15000)), &context).await.unwrap();
    let config: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(config["requestTimeoutMs"], 15000);
}

#[tokio::test]
async fn test_env_reset() {
    let context = context_for("http://localhost:3001/api".to_string());
    execute(set(Some(15000)), &context).await.unwrap();

    let output = execute(Command::Env(EnvCommand::Reset), &context).await.unwrap();
    let config: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(config["requestTimeoutMs"], 30000);
}

#[tokio::test]
async fn test_env_test_reports_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let context = context_for(format!("{}/api", server.uri()));
    let output = execute(Command::Env(EnvCommand::Test), &context).await.unwrap();
    let report: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["message"], "API connection established");
    assert_eq!(report["baseURL"], format!("{}/api", server.uri()));
}

#[tokio::test]
async fn test_login_whoami_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": "t1",
                "user": {"name": "Ana", "email": "ana@roadrw.com", "role": "gestor"}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let context = context_for(format!("{}/api", server.uri()));
    let output = execute(
        Command::Login {
            email: "ana@roadrw.com".to_string(),
            password: "s3cret".to_string(),
        },
        &context,
    )
    .await
    .unwrap();
    assert_eq!(output, "Signed in as Ana <ana@roadrw.com> (gestor)");

    let user: Value =
        serde_json::from_str(&execute(Command::Whoami, &context).await.unwrap()).unwrap();
    assert_eq!(user["role"], "gestor");

    assert_eq!(
        execute(Command::Logout, &context).await.unwrap(),
        "Signed out"
    );
    assert!(execute(Command::Whoami, &context).await.is_err());
}

#[tokio::test]
async fn test_refresh_without_session_fails() {
    let context = context_for("http://localhost:3001/api".to_string());
    assert!(execute(Command::Refresh, &context).await.is_err());
}

#[tokio::test]
async fn test_get_prints_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1}]
        })))
        .mount(&server)
        .await;

    let context = context_for(format!("{}/api", server.uri()));
    let output = execute(
        Command::Get {
            path: "/clientes".to_string(),
        },
        &context,
    )
    .await
    .unwrap();
    let body: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(body["data"][0]["id"], 1);
}
