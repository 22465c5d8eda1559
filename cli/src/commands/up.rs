//! `outpost up`: launch an instance and bring it to a deployed state.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CommandRunner;
use crate::application::services::instance::{self, HostOutcome};
use crate::domain::config::keys;
use crate::infra::aws::AwsCli;
use crate::output::TerminalReporter;

/// Run `outpost up`.
///
/// Launch, wait, then: host → push → env → install → deploy. The first
/// failing step stops the sequence; the instance reference stays recorded
/// so the remaining steps can be run one by one.
///
/// # Errors
///
/// Returns an error if a required setting is missing or any step fails.
pub async fn run<R: CommandRunner>(app: &mut AppContext<R>) -> Result<ExitCode> {
    app.settings.require(keys::KEYPAIR)?;
    app.settings.require(keys::SUBNET)?;

    if let Some(existing) = app.settings.instance() {
        if !app.confirm(&format!("Replace instance {}?", existing.id))? {
            app.output.info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
        app.output.warn(&format!(
            "{} keeps running; terminate it from the EC2 console when done",
            existing.id
        ));
    }

    let id = {
        let reporter = TerminalReporter::new(&app.output);
        instance::provision(
            &mut app.settings,
            &AwsCli::new(&app.runner),
            &app.store,
            &reporter,
        )
        .await?
    };

    let HostOutcome::Resolved(hostname) = super::host::resolve(app).await? else {
        anyhow::bail!("instance has no public hostname yet; retry with 'outpost host'");
    };
    super::transfer::push_files(app).await?;
    anyhow::ensure!(
        super::env::propagate(app).await?,
        "environment was not propagated; retry with 'outpost env'"
    );
    super::script::run_install(app).await?;
    super::script::run_deploy(app).await?;

    app.output.header("Instance is up");
    app.output.kv("id", &id);
    app.output.kv("host", &hostname);
    app.output.info("Keep it in sync: outpost watch");
    Ok(ExitCode::SUCCESS)
}
