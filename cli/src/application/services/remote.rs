//! Remote use-cases: environment propagation and the deploy/install scripts.

use std::process::ExitStatus;

use anyhow::{Context, Result};

use super::stderr_text;
use crate::application::ports::{ProgressReporter, Remote, SettingsStore};
use crate::domain::config::{Settings, keys};
use crate::domain::remote::{
    REMOTE_ENVIRONMENT_FILE, shell_quote, ssh_environment, user_environment_check,
    user_environment_enable,
};

/// Write the project settings to the instance as the login user's ssh
/// environment, enabling `PermitUserEnvironment` in sshd if needed.
///
/// The file is re-rendered from the parsed pairs, so dotenv quoting and
/// `export` prefixes do not reach sshd.
///
/// Returns `false` if a remote step failed (already reported). A missing
/// local file is only a notice.
///
/// # Errors
///
/// Returns an error if the settings file cannot be parsed or a transport
/// process cannot be spawned.
pub async fn propagate_env(
    store: &impl SettingsStore,
    remote: &impl Remote,
    reporter: &impl ProgressReporter,
) -> Result<bool> {
    if !store.exists() {
        reporter.warn(&format!(
            "{} not found; no environment to propagate",
            store.path().display()
        ));
        return Ok(true);
    }

    let env = ssh_environment(&store.read_pairs()?);
    for key in &env.skipped {
        reporter.warn(&format!("{key} spans several lines; not propagated"));
    }

    reporter.step("copying environment...");
    let output = remote
        .upload(&env.contents, REMOTE_ENVIRONMENT_FILE)
        .await
        .context("copying environment file")?;
    if !output.status.success() {
        reporter.error(&format!(
            "failed to copy environment: {}",
            stderr_text(&output)
        ));
        return Ok(false);
    }

    let check = remote
        .exec(&user_environment_check())
        .await
        .context("checking sshd configuration")?;
    if !check.status.success() {
        reporter.step("enabling PermitUserEnvironment and restarting sshd...");
        let enable = remote
            .exec(&user_environment_enable())
            .await
            .context("updating sshd configuration")?;
        if !enable.status.success() {
            reporter.error(&format!(
                "failed to enable user environment: {}",
                stderr_text(&enable)
            ));
            return Ok(false);
        }
    }

    reporter.success("environment propagated");
    Ok(true)
}

/// Run the configured deploy script inside the app directory.
///
/// # Errors
///
/// Returns an error if `ssh` cannot be spawned.
pub async fn deploy(settings: &Settings, remote: &impl Remote) -> Result<ExitStatus> {
    run_script(settings, remote, keys::DEPLOY_SCRIPT).await
}

/// Run the configured install script inside the app directory.
///
/// # Errors
///
/// Returns an error if `ssh` cannot be spawned.
pub async fn install(settings: &Settings, remote: &impl Remote) -> Result<ExitStatus> {
    run_script(settings, remote, keys::INSTALL_SCRIPT).await
}

async fn run_script(settings: &Settings, remote: &impl Remote, key: &str) -> Result<ExitStatus> {
    let script = settings.require(key)?;
    remote
        .run_in_app_dir(&format!("bash {}", shell_quote(script)))
        .await
        .with_context(|| format!("running {script}"))
}
