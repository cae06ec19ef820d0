//! Login, logout and token refresh against the backend auth endpoints

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::manager::ConfigManager;
use crate::model::Envelope;
use crate::permission;
use crate::session::{SessionCredential, UserProfile};

pub mod auth_api_path {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
    pub const PROFILE: &str = "/auth/profile";
    pub const CHANGE_PASSWORD: &str = "/auth/change-password";
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `data` block of login, register and refresh responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AuthPayload {
    token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserProfile>,
}

impl AuthPayload {
    fn from_envelope(response: &Envelope) -> Option<Self> {
        if !response.success {
            return None;
        }
        let data = response.data.clone()?;
        match serde_json::from_value(data) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Unexpected auth payload: {}", e);
                None
            }
        }
    }
}

/// Auth flow over the shared client
#[derive(Clone)]
pub struct AuthService {
    manager: Arc<ConfigManager>,
}

impl AuthService {
    pub fn new(manager: Arc<ConfigManager>) -> Self {
        Self { manager }
    }

    /// Posts credentials and stores the session on success. The backend
    /// envelope is returned either way.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Envelope> {
        let response: Envelope = self
            .manager
            .client()
            .post_json(auth_api_path::LOGIN, credentials)
            .await?;
        self.store_session(&response)?;
        Ok(response)
    }

    pub async fn register<B: Serialize + ?Sized>(&self, user_data: &B) -> Result<Envelope> {
        let response: Envelope = self
            .manager
            .client()
            .post_json(auth_api_path::REGISTER, user_data)
            .await?;
        self.store_session(&response)?;
        Ok(response)
    }

    /// Tells the backend, then clears local data whatever the outcome.
    pub async fn logout(&self) {
        if let Err(e) = self
            .manager
            .client()
            .post::<Envelope>(auth_api_path::LOGOUT)
            .await
        {
            warn!("Logout request failed: {}", e);
        }
        self.clear_auth_data();
    }

    pub fn clear_auth_data(&self) {
        self.manager.session().clear();
    }

    /// Exchanges the refresh token for a new bearer token. Returns `false`
    /// without a request when there is no refresh token; a failed refresh
    /// clears the session.
    pub async fn refresh_token(&self) -> bool {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body {
            refresh_token: String,
        }

        let Some(refresh_token) = self.manager.session().refresh_token() else {
            return false;
        };

        let result: Result<Envelope> = self
            .manager
            .client()
            .post_json(auth_api_path::REFRESH_TOKEN, &Body { refresh_token })
            .await;

        match result {
            Ok(response) => {
                let Some(AuthPayload {
                    token: Some(token),
                    refresh_token,
                    ..
                }) = AuthPayload::from_envelope(&response)
                else {
                    return false;
                };
                match self
                    .manager
                    .session()
                    .update_token(&token, refresh_token.as_deref())
                {
                    Ok(()) => {
                        debug!("Token refreshed");
                        true
                    }
                    Err(e) => {
                        warn!("Failed to store refreshed token: {}", e);
                        false
                    }
                }
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                self.clear_auth_data();
                false
            }
        }
    }

    /// Updates the profile and replaces the stored user on success.
    pub async fn update_profile<B: Serialize + ?Sized>(&self, profile: &B) -> Result<Envelope> {
        let response: Envelope = self
            .manager
            .client()
            .post_json(auth_api_path::PROFILE, profile)
            .await?;

        if response.success
            && let Some(data) = response.data.clone()
        {
            match serde_json::from_value::<UserProfile>(data) {
                Ok(user) => self.manager.session().update_user(&user)?,
                Err(e) => warn!("Profile response is not a user profile: {}", e),
            }
        }
        Ok(response)
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<Envelope> {
        self.manager
            .client()
            .post_json(auth_api_path::CHANGE_PASSWORD, request)
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Envelope> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }

        self.manager
            .client()
            .post_json(auth_api_path::FORGOT_PASSWORD, &Body { email })
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<Envelope> {
        #[derive(Serialize)]
        struct Body<'a> {
            token: &'a str,
            password: &'a str,
        }

        self.manager
            .client()
            .post_json(
                auth_api_path::RESET_PASSWORD,
                &Body {
                    token,
                    password: new_password,
                },
            )
            .await
    }

    pub fn is_authenticated(&self) -> bool {
        self.manager.session().is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.manager.session().current_user()
    }

    pub fn token(&self) -> Option<String> {
        self.manager.session().token()
    }

    pub fn has_role(&self, role: &str) -> bool {
        permission::has_role(self.current_user().as_ref(), role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        permission::has_permission(self.current_user().as_ref(), permission)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        permission::has_any_role(self.current_user().as_ref(), roles)
    }

    pub fn has_all_roles(&self, roles: &[&str]) -> bool {
        permission::has_all_roles(self.current_user().as_ref(), roles)
    }

    fn store_session(&self, response: &Envelope) -> Result<()> {
        match AuthPayload::from_envelope(response) {
            Some(AuthPayload {
                token: Some(token),
                refresh_token,
                user: Some(user),
            }) => self.manager.session().save(&SessionCredential {
                token,
                refresh_token,
                user,
            }),
            Some(AuthPayload { token: Some(_), .. }) => {
                warn!("Auth response carried a token without a user, session not stored");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> AuthService {
        let manager = ConfigManager::with_store(Arc::new(MemoryStore::new())).unwrap();
        AuthService::new(Arc::new(manager))
    }

    #[test]
    fn test_auth_payload_from_envelope() {
        let response: Envelope = serde_json::from_str(
            r#"{"success":true,"data":{"token":"t","refreshToken":"r","user":{"role":"admin"}}}"#,
        )
        .unwrap();
        let payload = AuthPayload::from_envelope(&response).unwrap();
        assert_eq!(payload.token.as_deref(), Some("t"));
        assert_eq!(payload.refresh_token.as_deref(), Some("r"));
        assert_eq!(payload.user.unwrap().role, "admin");

        let failed: Envelope =
            serde_json::from_str(r#"{"success":false,"data":{"token":"t"}}"#).unwrap();
        assert!(AuthPayload::from_envelope(&failed).is_none());
    }

    #[test]
    fn test_store_session_requires_token_and_user() {
        let service = service();

        let token_only: Envelope =
            serde_json::from_str(r#"{"success":true,"data":{"token":"t"}}"#).unwrap();
        service.store_session(&token_only).unwrap();
        assert!(!service.is_authenticated());
        assert!(service.token().is_none());

        let full: Envelope = serde_json::from_str(
            r#"{"success":true,"data":{"token":"t","user":{"role":"gestor"}}}"#,
        )
        .unwrap();
        service.store_session(&full).unwrap();
        assert!(service.is_authenticated());
        assert!(service.has_role("gestor"));
        assert!(!service.has_role("admin"));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_is_noop() {
        let service = service();
        assert!(!service.refresh_token().await);
    }

    #[test]
    fn test_role_checks_without_session() {
        let service = service();
        assert!(!service.has_role("admin"));
        assert!(!service.has_permission("admin"));
        assert!(!service.has_any_role(&["admin", "gestor"]));
    }
}
