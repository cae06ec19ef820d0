//! `roadrw env ...`

use roadrw_client::ConfigPatch;
use roadrw_client::environment;

use super::AppContext;
use crate::cli::EnvCommand;

pub async fn execute(command: EnvCommand, context: &AppContext) -> anyhow::Result<String> {
    let manager = context.manager();

    match command {
        EnvCommand::Show => Ok(serde_json::to_string_pretty(&manager.get_config())?),
        EnvCommand::List => Ok(list(&manager.get_config().environment_key)),
        EnvCommand::Use { key } => {
            let profile = manager.select_environment(&key)?;
            Ok(format!(
                "Switched to {} ({})",
                profile.display_name,
                profile.api_base_url()
            ))
        }
        EnvCommand::Set {
            base_url,
            timeout_ms,
            debug_mode,
            show_logs,
        } => {
            let patch = ConfigPatch {
                base_url,
                request_timeout_ms: timeout_ms,
                debug_mode,
                show_request_logs: show_logs,
                ..Default::default()
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to change, pass at least one field");
            }
            manager.update_config(patch)?;
            Ok(serde_json::to_string_pretty(&manager.get_config())?)
        }
        EnvCommand::Reset => {
            manager.reset_config()?;
            Ok(serde_json::to_string_pretty(&manager.get_config())?)
        }
        EnvCommand::Test => {
            let report = manager.test_connection().await;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        EnvCommand::Stats => Ok(serde_json::to_string_pretty(&manager.api_stats())?),
    }
}

/// One line per profile, the active one marked with `*`.
fn list(active: &str) -> String {
    environment::profiles()
        .iter()
        .map(|profile| {
            format!(
                "{} {:<12} {:<24} {}",
                if profile.key == active { "*" } else { " " },
                profile.key,
                profile.display_name,
                profile.api_base_url()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
