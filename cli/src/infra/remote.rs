//! Infrastructure implementation of the `RemoteShell` and `FileSync` ports.
//!
//! `SshRemote<R>` turns an `SshTarget` into `ssh`, `scp`, `rsync` and
//! `unison` invocations routed through a `CommandRunner`. Uploads are staged
//! in a private temp file that is removed once `scp` returns.

use std::io::Write;
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, FileSync, RemoteShell};
use crate::domain::remote::SshTarget;

/// SSH-based adapter for one instance.
pub struct SshRemote<'a, R: CommandRunner> {
    runner: &'a R,
    target: SshTarget,
}

impl<'a, R: CommandRunner> SshRemote<'a, R> {
    /// Create an adapter for `target` that spawns through `runner`.
    pub fn new(runner: &'a R, target: SshTarget) -> Self {
        Self { runner, target }
    }

    /// The connection parameters in use.
    #[must_use]
    pub fn target(&self) -> &SshTarget {
        &self.target
    }
}

impl<R: CommandRunner> RemoteShell for SshRemote<'_, R> {
    async fn exec(&self, command: &str) -> Result<Output> {
        self.runner
            .run("ssh", &self.target.ssh_args(command, false))
            .await
            .context("ssh exec")
    }

    async fn run_in_app_dir(&self, command: &str) -> Result<ExitStatus> {
        let line = self.target.in_app_dir(Some(command));
        self.runner
            .run_status("ssh", &self.target.ssh_args(&line, false))
            .await
            .context("ssh")
    }

    async fn interactive(&self, command: Option<&str>) -> Result<ExitStatus> {
        let line = self.target.in_app_dir(command);
        self.runner
            .run_status("ssh", &self.target.ssh_args(&line, true))
            .await
            .context("ssh -t")
    }
}

impl<R: CommandRunner> FileSync for SshRemote<'_, R> {
    async fn push(&self) -> Result<Output> {
        self.runner
            .run("rsync", &self.target.rsync_push_args())
            .await
            .context("rsync push")
    }

    async fn pull(&self) -> Result<Output> {
        self.runner
            .run("rsync", &self.target.rsync_pull_args())
            .await
            .context("rsync pull")
    }

    async fn sync(&self) -> Result<Output> {
        self.runner
            .run("unison", &self.target.unison_args())
            .await
            .context("unison")
    }

    async fn upload(&self, contents: &str, remote_path: &str) -> Result<Output> {
        let mut staged = tempfile::NamedTempFile::new().context("creating upload file")?;
        staged
            .write_all(contents.as_bytes())
            .and_then(|()| staged.flush())
            .context("writing upload file")?;
        self.runner
            .run("scp", &self.target.scp_args(staged.path(), remote_path))
            .await
            .context("scp")
    }
}
