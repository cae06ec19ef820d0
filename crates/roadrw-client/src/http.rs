//! HTTP request client with auth attachment, request logging and 401 handling
//!
//! An [`HttpClient`] is built from one [`ActiveClientConfig`] snapshot and
//! never changes afterwards. Reconfiguration builds a new instance; requests
//! already running keep the instance they started on.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, info, warn};

use crate::config::ActiveClientConfig;
use crate::error::{ClientError, ErrorInfo, Result};
use crate::event::{LOGIN_ROUTE, SessionEvents, SessionExpired};
use crate::session::SessionStore;

pub const HEALTH_PATH: &str = "/health";
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared request client for one configuration snapshot
pub struct HttpClient {
    client: Client,
    config: ActiveClientConfig,
    session: SessionStore,
    events: Arc<dyn SessionEvents>,
}

impl HttpClient {
    pub fn new(
        config: ActiveClientConfig,
        session: SessionStore,
        events: Arc<dyn SessionEvents>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Other(e.into()))?;

        Ok(Self {
            client,
            config,
            session,
            events,
        })
    }

    pub fn config(&self) -> &ActiveClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Joins `path` onto the base URL. Absolute URLs are used unchanged.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, |builder| builder).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        self.execute(Method::GET, path, |builder| builder.query(query))
            .await
    }

    /// POST without a body
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::POST, path, |builder| builder).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::POST, path, |builder| builder.json(body))
            .await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::PUT, path, |builder| builder.json(body))
            .await
    }

    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::PATCH, path, |builder| builder.json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::DELETE, path, |builder| builder).await
    }

    /// Unauthenticated liveness probe against the backend root. Uses a fixed
    /// timeout independent of the configured request timeout.
    pub async fn check_health(&self, api_prefix: &str) -> anyhow::Result<serde_json::Value> {
        let url = health_url(&self.config.base_url, api_prefix);

        let result = async {
            let response = self
                .client
                .get(&url)
                .timeout(HEALTH_TIMEOUT)
                .send()
                .await?
                .error_for_status()?;
            // Some deployments answer the probe with plain text
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(
                serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)),
            )
        }
        .await;

        match result {
            Ok(body) => {
                if self.config.debug_mode {
                    info!(url = %url, body = %body, "API health check passed");
                }
                Ok(body)
            }
            Err(e) => {
                if self.config.debug_mode {
                    error!(url = %url, "API health check failed: {}", e);
                }
                Err(e.into())
            }
        }
    }

    /// Runs one request through the pipeline: request interceptor, send,
    /// then the response or error interceptor. No retries.
    async fn execute<T, F>(&self, method: Method, path: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.build_url(path);
        let builder = self.on_request(self.client.request(method.clone(), &url), &method, path);

        let response = match build(builder).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.on_transport_error(&method, path, e)),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(self.on_transport_error(&method, path, e)),
        };

        if status.is_success() {
            self.on_response(&method, path, status, &body);
            decode_body(&body)
        } else {
            Err(self.on_error_status(&method, path, status, &body))
        }
    }

    fn on_request(&self, mut builder: RequestBuilder, method: &Method, path: &str) -> RequestBuilder {
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        if self.config.request_logging() {
            info!(
                environment = %self.config.environment_key,
                method = %method,
                path,
                base_url = %self.config.base_url,
                timeout_ms = self.config.request_timeout_ms,
                "API request"
            );
        }

        builder
    }

    fn on_response(&self, method: &Method, path: &str, status: StatusCode, body: &[u8]) {
        if self.config.request_logging() {
            info!(
                environment = %self.config.environment_key,
                method = %method,
                path,
                status = status.as_u16(),
                success = envelope_success(body),
                "API response"
            );
        }
    }

    fn on_error_status(
        &self,
        method: &Method,
        path: &str,
        status: StatusCode,
        body: &[u8],
    ) -> ClientError {
        let message = envelope_message(body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        let info = self.error_info(Some(status.as_u16()), message, method, path);

        if status == StatusCode::UNAUTHORIZED {
            self.session.clear();
            if self.config.debug_mode {
                warn!(method = %method, path, "Token expired, redirecting to login");
            }
            self.events.session_expired(&SessionExpired {
                method: info.method.clone(),
                path: info.url.clone(),
                environment: info.environment.clone(),
                redirect_to: LOGIN_ROUTE,
            });
            return ClientError::AuthExpired(info);
        }

        if self.config.debug_mode {
            error!(
                status = status.as_u16(),
                method = %info.method,
                url = %info.url,
                environment = %info.environment,
                "API error: {}",
                info.message
            );
        }
        ClientError::Backend(info)
    }

    fn on_transport_error(&self, method: &Method, path: &str, e: reqwest::Error) -> ClientError {
        let info = self.error_info(None, e.to_string(), method, path);
        if self.config.debug_mode {
            error!(
                method = %info.method,
                url = %info.url,
                environment = %info.environment,
                timeout = e.is_timeout(),
                "API transport error: {}",
                info.message
            );
        } else {
            debug!(method = %info.method, url = %info.url, "API transport error: {}", e);
        }
        ClientError::Transport(info)
    }

    fn error_info(&self, status: Option<u16>, message: String, method: &Method, path: &str) -> ErrorInfo {
        ErrorInfo {
            status,
            message,
            url: path.to_string(),
            method: method.as_str().to_string(),
            environment: self.config.environment_key.clone(),
        }
    }
}

/// Health endpoint for a base URL: the trailing API prefix is dropped and
/// `/health` appended.
pub fn health_url(base_url: &str, api_prefix: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let root = match trimmed.strip_suffix(api_prefix.trim_end_matches('/')) {
        Some(root) if !api_prefix.is_empty() => root,
        _ => trimmed,
    };
    format!("{}{}", root.trim_end_matches('/'), HEALTH_PATH)
}

/// The envelope's own `success` flag; anything unreadable counts as failure.
fn envelope_success(body: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("success").and_then(|s| s.as_bool()))
        .unwrap_or(false)
}

/// Decodes a 2xx body. An empty body (204, or a bare 200) reads as JSON
/// `null`, or as `{"success": true}` for targets that reject `null`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(serde_json::Value::Null)
            .or_else(|_| serde_json::from_value(serde_json::json!({ "success": true })))
            .map_err(Into::into);
    }
    Ok(serde_json::from_slice(body)?)
}

fn envelope_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NoopSessionEvents;
    use crate::storage::MemoryStore;

    fn client(base_url: &str) -> HttpClient {
        let config = ActiveClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        HttpClient::new(
            config,
            SessionStore::new(Arc::new(MemoryStore::new())),
            Arc::new(NoopSessionEvents),
        )
        .unwrap()
    }

    #[test]
    fn test_build_url() {
        let client = client("http://localhost:3001/api");
        assert_eq!(
            client.build_url("/clientes"),
            "http://localhost:3001/api/clientes"
        );
        assert_eq!(
            client.build_url("clientes/1"),
            "http://localhost:3001/api/clientes/1"
        );
        assert_eq!(
            client.build_url("https://other.host/x"),
            "https://other.host/x"
        );
    }

    #[test]
    fn test_build_url_trailing_slash() {
        let client = client("http://localhost:3001/api/");
        assert_eq!(
            client.build_url("/clientes"),
            "http://localhost:3001/api/clientes"
        );
    }

    #[test]
    fn test_health_url() {
        assert_eq!(
            health_url("http://localhost:3001/api", "/api"),
            "http://localhost:3001/health"
        );
        assert_eq!(
            health_url("https://api.roadrw.com/api/", "/api"),
            "https://api.roadrw.com/health"
        );
        assert_eq!(
            health_url("https://api.example.com", "/api"),
            "https://api.example.com/health"
        );
        assert_eq!(
            health_url("https://api.example.com/v2", ""),
            "https://api.example.com/v2/health"
        );
    }

    #[test]
    fn test_envelope_helpers() {
        assert!(envelope_success(br#"{"success":true}"#));
        assert!(!envelope_success(br#"{"success":false}"#));
        assert!(!envelope_success(b"<html>"));
        assert_eq!(
            envelope_message(r#"{"success":false,"message":"Dados inválidos"}"#.as_bytes())
                .as_deref(),
            Some("Dados inválidos")
        );
        assert_eq!(envelope_message(br#"{"message":""}"#), None);
        assert_eq!(envelope_message(b""), None);
    }

    #[test]
    fn test_decode_empty_body() {
        let envelope: crate::model::Envelope = decode_body(b"").unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_none());

        let value: serde_json::Value = decode_body(b"  \n").unwrap();
        assert!(value.is_null());
        decode_body::<()>(b"").unwrap();
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_body::<crate::model::Envelope>(b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }
}
