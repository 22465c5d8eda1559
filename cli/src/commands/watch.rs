//! `outpost watch`: sync every few seconds, deploy on change.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::application::services::watch::{POLL_INTERVAL, Watcher};
use crate::output::TerminalReporter;

/// Run `outpost watch` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if there is no hostname or key pair.
pub async fn run<R: CommandRunner>(app: &AppContext<R>) -> Result<ExitCode> {
    let remote = super::remote(app)?;
    app.output.info(&format!(
        "watching {} every {}s; Ctrl-C to stop",
        remote.target().destination(),
        POLL_INTERVAL.as_secs()
    ));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    Watcher::new()
        .run(
            &app.settings,
            &remote,
            &TerminalReporter::new(&app.output),
            POLL_INTERVAL,
            shutdown,
        )
        .await;

    app.output.info("stopped watching");
    Ok(ExitCode::SUCCESS)
}
