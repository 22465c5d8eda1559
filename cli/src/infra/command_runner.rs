//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Children are killed when their future is
//! dropped, so interrupting `watch` does not leave a sync running.

use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        tracing::debug!(program, ?args, "running (captured)");
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {program}"))?;
        tracing::debug!(program, status = %output.status, "finished");
        Ok(output)
    }

    async fn run_status(&self, program: &str, args: &[String]) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, "running (attached)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))?;
        tracing::debug!(program, %status, "finished");
        Ok(status)
    }
}
