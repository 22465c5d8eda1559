//! The `watch` loop: sync, deploy on change, sleep, repeat.
//!
//! Bidirectional sync is tried first; the first time it fails the loop
//! switches to one-way push for the rest of the session.

use std::future::Future;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use super::remote::deploy;
use super::stderr_text;
use crate::application::ports::{ProgressReporter, Remote};
use crate::domain::config::Settings;
use crate::domain::sync::SyncStrategy;

/// Pause between iterations.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Every strategy tried this iteration failed.
    SyncFailed,
    /// Sync succeeded with nothing to transfer.
    Unchanged,
    /// Files changed and the deploy script ran; `true` if it succeeded.
    Deployed(bool),
}

/// Watch-loop state: only the current strategy survives between iterations.
#[derive(Debug)]
pub struct Watcher {
    strategy: SyncStrategy,
}

impl Default for Watcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Watcher {
    /// Start with bidirectional sync.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategy: SyncStrategy::Bidirectional,
        }
    }

    /// Strategy the next iteration will use.
    #[must_use]
    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    /// Run one iteration: sync (with the one-time fallback), then deploy if
    /// anything moved.
    pub async fn tick(
        &mut self,
        settings: &Settings,
        remote: &impl Remote,
        reporter: &impl ProgressReporter,
    ) -> Tick {
        let mut result = attempt(remote, self.strategy).await;

        if let Err(reason) = &result {
            if let Some(next) = self.strategy.fallback() {
                reporter.warn(&format!(
                    "{} failed ({reason}); using {} from now on",
                    self.strategy.label(),
                    next.label()
                ));
                self.strategy = next;
                result = attempt(remote, next).await;
            }
        }

        let output = match result {
            Ok(output) => output,
            Err(reason) => {
                reporter.error(&format!("{} failed: {reason}", self.strategy.label()));
                return Tick::SyncFailed;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !self.strategy.reports_changes(&stdout, &stderr) {
            return Tick::Unchanged;
        }
        tracing::debug!(
            strategy = self.strategy.label(),
            stdout = %stdout.trim(),
            stderr = %stderr.trim(),
            "synced"
        );
        reporter.success(&format!("changes synced ({})", self.strategy.label()));

        match deploy(settings, remote).await {
            Ok(status) if status.success() => {
                reporter.success("deployed");
                Tick::Deployed(true)
            }
            Ok(status) => {
                reporter.error(&format!("deploy failed ({status})"));
                Tick::Deployed(false)
            }
            Err(e) => {
                reporter.error(&format!("deploy failed: {e:#}"));
                Tick::Deployed(false)
            }
        }
    }

    /// Loop forever, pausing `interval` after every iteration, until
    /// `shutdown` resolves.
    pub async fn run(
        &mut self,
        settings: &Settings,
        remote: &impl Remote,
        reporter: &impl ProgressReporter,
        interval: Duration,
        shutdown: impl Future<Output = ()>,
    ) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => return,
                _ = self.tick(settings, remote, reporter) => {}
            }
            tokio::select! {
                () = &mut shutdown => return,
                () = tokio::time::sleep(interval) => {}
            }
        }
    }
}

/// Run one strategy, folding a non-zero exit into the error side.
async fn attempt(remote: &impl Remote, strategy: SyncStrategy) -> Result<Output, String> {
    let result = match strategy {
        SyncStrategy::Bidirectional => remote.sync().await,
        SyncStrategy::OneWayPush => remote.push().await,
    };
    match result {
        Ok(output) if output.status.success() => Ok(output),
        Ok(output) => Err(stderr_text(&output)),
        Err(e) => Err(format!("{e:#}")),
    }
}
