//! `outpost env`: copy the project settings to the instance.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::application::services::remote::propagate_env;
use crate::output::TerminalReporter;

/// Run `outpost env`.
///
/// # Errors
///
/// Returns an error if the instance cannot be reached.
pub async fn run<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    if propagate(app).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Returns `false` if a remote step failed; the failure is already reported.
pub(crate) async fn propagate<R: CommandRunner>(app: &AppContext<R>) -> Result<bool> {
    let remote = super::remote(app)?;
    propagate_env(&app.store, &remote, &TerminalReporter::new(&app.output)).await
}
