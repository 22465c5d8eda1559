//! Instance lifecycle: provision, terminate, resolve hostname.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use super::config_service::persist;
use super::stderr_text;
use crate::application::ports::{CloudProvider, HostRegistry, ProgressReporter, SettingsStore};
use crate::domain::config::{Settings, keys};
use crate::domain::instance::{InstanceSpec, parse_launched_id, parse_public_dns};

/// Result of `terminate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminateOutcome {
    /// The provider accepted the termination request.
    Requested,
    /// The provider rejected the request (or could not be reached); the
    /// message is what it said.
    RequestFailed(String),
}

/// Result of `resolve_host`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    /// The public hostname, now persisted.
    Resolved(String),
    /// The provider returned no public hostname; nothing was changed.
    Unresolved,
}

/// Launch a new instance, tag it, record its id and wait until it is healthy.
///
/// Requires `KEYPAIR` and `SUBNET`. The id is persisted before the wait so an
/// interrupted wait still leaves a usable reference behind. Returns the id.
///
/// # Errors
///
/// Returns an error if a required setting is missing, the provider rejects
/// the launch, its answer cannot be parsed, or the wait fails.
pub async fn provision(
    settings: &mut Settings,
    cloud: &impl CloudProvider,
    store: &impl SettingsStore,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let keypair = settings.require(keys::KEYPAIR)?.to_string();
    let subnet = settings.require(keys::SUBNET)?.to_string();

    reporter.step("launching instance...");
    let output = cloud
        .launch(&InstanceSpec {
            image: settings.get(keys::AMI),
            instance_type: settings.get(keys::INSTANCE_TYPE),
            keypair: &keypair,
            subnet: &subnet,
        })
        .await
        .context("launching instance")?;
    anyhow::ensure!(
        output.status.success(),
        "failed to launch instance.\n{}",
        stderr_text(&output)
    );
    let id = parse_launched_id(&output.stdout).context("reading run-instances output")?;
    tracing::debug!(%id, "instance launched");

    if let Some(name) = settings.non_empty(keys::INSTANCE_NAME).map(String::from) {
        match cloud.tag_name(&id, &name).await {
            Ok(o) if o.status.success() => {}
            Ok(o) => reporter.warn(&format!("could not tag {id}: {}", stderr_text(&o))),
            Err(e) => reporter.warn(&format!("could not tag {id}: {e:#}")),
        }
    }

    persist(settings, store, keys::INSTANCE_ID, &id)?;
    persist(settings, store, keys::INSTANCE_HOSTNAME, "")?;
    reporter.success(&format!("instance {id} launched"));

    reporter.step(&format!("waiting for {id} to pass status checks..."));
    let output = cloud
        .wait_until_ready(&id)
        .await
        .context("waiting for instance")?;
    anyhow::ensure!(
        output.status.success(),
        "instance {id} did not become ready.\n{}",
        stderr_text(&output)
    );
    reporter.success(&format!("instance {id} is ready"));
    Ok(id)
}

/// Request termination and forget the instance.
///
/// The reference is cleared whatever the provider answers; a failed request
/// is returned so the caller can tell the user which id to clean up by hand.
///
/// # Errors
///
/// Returns an error if there is no instance or the settings file cannot be
/// written.
pub async fn terminate(
    settings: &mut Settings,
    cloud: &impl CloudProvider,
    store: &impl SettingsStore,
) -> Result<TerminateOutcome> {
    let instance = settings.require_instance()?;

    let outcome = match cloud.terminate(&instance.id).await {
        Ok(o) if o.status.success() => TerminateOutcome::Requested,
        Ok(o) => TerminateOutcome::RequestFailed(stderr_text(&o)),
        Err(e) => TerminateOutcome::RequestFailed(format!("{e:#}")),
    };
    tracing::debug!(id = %instance.id, ?outcome, "terminate requested");

    persist(settings, store, keys::INSTANCE_ID, "")?;
    persist(settings, store, keys::INSTANCE_HOSTNAME, "")?;
    Ok(outcome)
}

/// Look up the instance's public hostname, record it and trust its host keys.
///
/// When the provider has no hostname the stored value is left as it was.
///
/// # Errors
///
/// Returns an error if there is no instance, the describe call fails, or the
/// settings file cannot be written.
pub async fn resolve_host(
    settings: &mut Settings,
    cloud: &impl CloudProvider,
    store: &impl SettingsStore,
    registry: &impl HostRegistry,
    reporter: &impl ProgressReporter,
) -> Result<HostOutcome> {
    let instance = settings.require_instance()?;

    let output = cloud
        .describe(&instance.id)
        .await
        .context("describing instance")?;
    anyhow::ensure!(
        output.status.success(),
        "failed to describe instance {}.\n{}",
        instance.id,
        stderr_text(&output)
    );

    let Some(hostname) = parse_public_dns(&output.stdout)? else {
        reporter.error(&format!("instance {} has no public hostname", instance.id));
        return Ok(HostOutcome::Unresolved);
    };

    persist(settings, store, keys::INSTANCE_HOSTNAME, &hostname)?;
    reporter.success(&format!("hostname {hostname}"));

    match registry.register(&hostname).await {
        Ok(true) => {}
        Ok(false) => reporter.warn(&format!(
            "{hostname} offered no host keys; ssh will ask on first connect"
        )),
        Err(e) => reporter.warn(&format!("could not add {hostname} to known_hosts: {e:#}")),
    }
    Ok(HostOutcome::Resolved(hostname))
}
