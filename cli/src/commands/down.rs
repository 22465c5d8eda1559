//! `outpost down`: terminate the instance and forget it.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::application::services::instance::{self, TerminateOutcome};
use crate::infra::aws::AwsCli;

/// Run `outpost down`.
///
/// The reference is cleared even when the provider rejects the request; the
/// id is printed so the instance can be cleaned up by hand.
///
/// # Errors
///
/// Returns an error if there is no instance, the prompt fails, or the
/// settings file cannot be written.
pub async fn run<R: CommandRunner>(app: &mut AppContext<R>) -> Result<ExitCode> {
    let id = app.settings.require_instance()?.id;
    if !app.confirm(&format!("Terminate instance {id}?"))? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    app.output.step(&format!("terminating {id}..."));
    let outcome = instance::terminate(&mut app.settings, &AwsCli::new(&app.runner), &app.store)
        .await?;

    match outcome {
        TerminateOutcome::Requested => {
            app.output.success(&format!("instance {id} terminating"));
            Ok(ExitCode::SUCCESS)
        }
        TerminateOutcome::RequestFailed(reason) => {
            app.output.error(&format!("terminate failed: {reason}"));
            app.output.warn(&format!(
                "forgot {id} anyway; check the EC2 console and terminate it by hand"
            ));
            Ok(ExitCode::FAILURE)
        }
    }
}
