//! `outpost host`: refresh the recorded hostname and trust its host keys.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::application::services::instance::{self, HostOutcome};
use crate::infra::aws::AwsCli;
use crate::infra::known_hosts::KeyscanRegistry;
use crate::output::TerminalReporter;

/// Run `outpost host`.
///
/// # Errors
///
/// Returns an error if there is no instance or the provider cannot be asked.
pub async fn run<R: CommandRunner>(app: &mut AppContext<R>) -> Result<ExitCode> {
    match resolve(app).await? {
        HostOutcome::Resolved(_) => Ok(ExitCode::SUCCESS),
        HostOutcome::Unresolved => Ok(ExitCode::FAILURE),
    }
}

pub(crate) async fn resolve<R: CommandRunner>(app: &mut AppContext<R>) -> Result<HostOutcome> {
    instance::resolve_host(
        &mut app.settings,
        &AwsCli::new(&app.runner),
        &app.store,
        &KeyscanRegistry::new(&app.runner, &app.known_hosts),
        &TerminalReporter::new(&app.output),
    )
    .await
}
