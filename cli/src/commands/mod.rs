//! Command implementations
//!
//! Handlers are thin: they build adapters from the `AppContext`, call an
//! application service and turn its outcome into an exit code.

pub mod down;
pub mod env;
pub mod host;
pub mod script;
pub mod ssh;
pub mod transfer;
pub mod up;
pub mod watch;

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::cli::Command;
use crate::domain::SshTarget;
use crate::infra::remote::SshRemote;

/// Run one command.
///
/// Every command except `up` needs an instance reference; without one it
/// fails before any process is spawned.
///
/// # Errors
///
/// Returns an error if a precondition is not met or the command fails.
pub async fn dispatch<R: CommandRunner>(
    app: &mut AppContext<R>,
    command: Command,
) -> Result<ExitCode> {
    if !matches!(command, Command::Up) {
        app.settings.require_instance()?;
    }
    tracing::debug!(?command, "dispatching");

    match command {
        Command::Deploy => script::deploy(app).await,
        Command::Down => down::run(app).await,
        Command::Env => env::run(app).await,
        Command::Host => host::run(app).await,
        Command::Install => script::install(app).await,
        Command::Pull => transfer::pull(app).await,
        Command::Push => transfer::push(app).await,
        Command::Ssh(args) => ssh::run(app, &args).await,
        Command::Sync => transfer::sync(app).await,
        Command::Up => up::run(app).await,
        Command::Watch => watch::run(app).await,
    }
}

/// SSH adapter for the recorded instance.
///
/// # Errors
///
/// Returns an error if the instance id, hostname or key pair is missing.
pub(crate) fn remote<R: CommandRunner>(app: &AppContext<R>) -> Result<SshRemote<'_, R>> {
    let target = SshTarget::from_settings(&app.settings, &app.ssh_dir)?;
    Ok(SshRemote::new(&app.runner, target))
}
