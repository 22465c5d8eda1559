//! `outpost deploy` and `outpost install`: run a project script remotely.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::application::services::remote;
use crate::domain::config::keys;

/// Run `outpost deploy`.
///
/// # Errors
///
/// Returns an error if the script cannot be started or exits non-zero.
pub async fn deploy<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    run_deploy(app).await?;
    Ok(ExitCode::SUCCESS)
}

/// Run `outpost install`.
///
/// # Errors
///
/// Returns an error if the script cannot be started or exits non-zero.
pub async fn install<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    run_install(app).await?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn run_deploy<R: CommandRunner>(app: &AppContext<R>) -> Result<()> {
    let script = app.settings.get(keys::DEPLOY_SCRIPT);
    app.output.step(&format!("running {script}..."));
    let status = remote::deploy(&app.settings, &super::remote(app)?).await?;
    anyhow::ensure!(status.success(), "{script} failed ({status})");
    app.output.success("deployed");
    Ok(())
}

pub(crate) async fn run_install<R: CommandRunner>(app: &AppContext<R>) -> Result<()> {
    let script = app.settings.get(keys::INSTALL_SCRIPT);
    app.output.step(&format!("running {script}..."));
    let status = remote::install(&app.settings, &super::remote(app)?).await?;
    anyhow::ensure!(status.success(), "{script} failed ({status})");
    app.output.success("installed");
    Ok(())
}
