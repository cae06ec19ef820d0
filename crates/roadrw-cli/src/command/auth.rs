//! `roadrw login | logout | whoami | refresh`

use roadrw_client::LoginRequest;

use super::AppContext;

pub async fn login(context: &AppContext, email: String, password: String) -> anyhow::Result<String> {
    let auth = context.auth();
    let response = auth.login(&LoginRequest::new(email, password)).await?;

    match auth.current_user() {
        Some(user) if response.success && auth.is_authenticated() => Ok(format!(
            "Signed in as {} <{}> ({})",
            user.name, user.email, user.role
        )),
        _ => anyhow::bail!(
            "Login failed: {}",
            response
                .message
                .unwrap_or_else(|| "no session in response".to_string())
        ),
    }
}

pub async fn logout(context: &AppContext) -> anyhow::Result<String> {
    context.auth().logout().await;
    Ok("Signed out".to_string())
}

pub fn whoami(context: &AppContext) -> anyhow::Result<String> {
    match context.auth().current_user() {
        Some(user) => Ok(serde_json::to_string_pretty(&user)?),
        None => anyhow::bail!("Not signed in"),
    }
}

pub async fn refresh(context: &AppContext) -> anyhow::Result<String> {
    if context.auth().refresh_token().await {
        Ok("Token refreshed".to_string())
    } else {
        anyhow::bail!("Token refresh failed, please log in again")
    }
}
