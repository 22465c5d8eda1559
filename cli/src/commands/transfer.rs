//! `outpost push | pull | sync`: move files between here and the instance.

use std::process::{ExitCode, Output};

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::{CommandRunner, FileSync};
use crate::application::services::stderr_text;

/// Run `outpost push`.
///
/// # Errors
///
/// Returns an error if `rsync` cannot be started or fails.
pub async fn push<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    push_files(app).await?;
    Ok(ExitCode::SUCCESS)
}

/// Run `outpost pull`.
///
/// # Errors
///
/// Returns an error if `rsync` cannot be started or fails.
pub async fn pull<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    let remote = super::remote(app)?;
    app.output.step("pulling from instance...");
    let output = remote.pull().await.context("running rsync")?;
    report(app, "pull", &output)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `outpost sync`.
///
/// # Errors
///
/// Returns an error if `unison` cannot be started or fails.
pub async fn sync<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    let remote = super::remote(app)?;
    app.output.step("syncing with instance...");
    let output = remote.sync().await.context("running unison")?;
    report(app, "sync", &output)?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn push_files<R: CommandRunner>(app: &AppContext<R>) -> Result<()> {
    let remote = super::remote(app)?;
    app.output.step("pushing to instance...");
    let output = remote.push().await.context("running rsync")?;
    report(app, "push", &output)
}

/// Echo the tool's report and fail on a non-zero exit.
///
/// unison lists what it propagated on stderr, so a successful run echoes
/// both streams.
fn report<R: CommandRunner>(app: &AppContext<R>, what: &str, output: &Output) -> Result<()> {
    app.output.raw(&String::from_utf8_lossy(&output.stdout));
    anyhow::ensure!(
        output.status.success(),
        "{what} failed.\n{}",
        stderr_text(output)
    );
    app.output.raw(&String::from_utf8_lossy(&output.stderr));
    app.output.success(&format!("{what} complete"));
    Ok(())
}
