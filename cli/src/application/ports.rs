//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::InstanceSpec;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Neither method applies a timeout: provider waits can legitimately take
/// many minutes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[String]) -> Result<Output>;
    /// Run a program attached to the current terminal and return its exit status.
    async fn run_status(&self, program: &str, args: &[String]) -> Result<ExitStatus>;
}

// ── Cloud Provider Port ───────────────────────────────────────────────────────

/// Instance lifecycle operations against the cloud control plane.
#[allow(async_fn_in_trait)]
pub trait CloudProvider {
    /// Request a new instance; stdout carries the provider's JSON answer.
    async fn launch(&self, spec: &InstanceSpec<'_>) -> Result<Output>;
    /// Attach a `Name` tag to an instance.
    async fn tag_name(&self, id: &str, name: &str) -> Result<Output>;
    /// Block until the provider reports the instance healthy.
    async fn wait_until_ready(&self, id: &str) -> Result<Output>;
    /// Request termination.
    async fn terminate(&self, id: &str) -> Result<Output>;
    /// Describe one instance; stdout carries the provider's JSON answer.
    async fn describe(&self, id: &str) -> Result<Output>;
}

// ── Remote Ports ──────────────────────────────────────────────────────────────

/// Command execution on the instance.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Run `command` from the login home and capture its output.
    async fn exec(&self, command: &str) -> Result<Output>;
    /// Run `command` inside the app directory, streaming to our terminal.
    async fn run_in_app_dir(&self, command: &str) -> Result<ExitStatus>;
    /// Run `command` inside the app directory with a pseudo-terminal, or
    /// open a login shell there when `command` is `None`.
    async fn interactive(&self, command: Option<&str>) -> Result<ExitStatus>;
}

/// File movement between the working directory and the instance.
#[allow(async_fn_in_trait)]
pub trait FileSync {
    /// Mirror local → remote.
    async fn push(&self) -> Result<Output>;
    /// Mirror remote → local.
    async fn pull(&self) -> Result<Output>;
    /// Two-way reconciliation.
    async fn sync(&self) -> Result<Output>;
    /// Copy one local file to a path relative to the remote login home.
    async fn upload(&self, contents: &str, remote_path: &str) -> Result<Output>;
}

/// Composite trait: anything that can both run commands and move files.
pub trait Remote: RemoteShell + FileSync {}

/// Blanket implementation: any type implementing both sub-traits is a `Remote`.
impl<T> Remote for T where T: RemoteShell + FileSync {}

// ── Local State Ports ─────────────────────────────────────────────────────────

/// Abstracts the project settings file.
pub trait SettingsStore {
    /// Location of the file, for messages and for copying it elsewhere.
    fn path(&self) -> &Path;
    /// Whether the file exists on disk.
    fn exists(&self) -> bool;
    /// Parsed `(key, value)` pairs in file order; none if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn read_pairs(&self) -> Result<Vec<(String, String)>>;
    /// Write `key=value`, replacing any existing value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    fn upsert(&self, key: &str, value: &str) -> Result<()>;
}

/// Abstracts the local trusted-hosts registry.
#[allow(async_fn_in_trait)]
pub trait HostRegistry {
    /// Fetch `host`'s keys and trust them. Returns `false` if the host
    /// offered no keys.
    async fn register(&self, host: &str) -> Result<bool>;
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Returns `true` if the user agreed.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown (e.g. no TTY).
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message on the error stream.
    fn error(&self, message: &str);
}
