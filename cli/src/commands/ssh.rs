//! `outpost ssh`: shell or one-off command in the app directory.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{CommandRunner, RemoteShell};

/// Arguments for the ssh command.
#[derive(Args, Debug)]
#[command(trailing_var_arg = true)]
pub struct SshArgs {
    /// Command to run instead of a login shell
    #[arg(allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run `outpost ssh`.
///
/// The remote exit status becomes ours.
///
/// # Errors
///
/// Returns an error if there is no hostname or `ssh` cannot be started.
pub async fn run<R: CommandRunner>(app: &AppContext<R>, args: &SshArgs) -> Result<ExitCode> {
    let remote = super::remote(app)?;
    let command = (!args.command.is_empty()).then(|| args.command.join(" "));
    let status = remote
        .interactive(command.as_deref())
        .await
        .context("failed to run ssh")?;

    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(255)))
}
