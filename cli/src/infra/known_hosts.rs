//! Known-hosts registration: `KnownHostsManager` and the `ssh-keyscan`
//! backed `HostRegistry`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostRegistry};

/// Manages the user's OpenSSH `known_hosts` file.
pub struct KnownHostsManager {
    path: PathBuf,
}

impl KnownHostsManager {
    /// Creates a manager pointing at `~/.ssh/known_hosts`
    /// (`OUTPOST_KNOWN_HOSTS` overrides).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Ok(val) = std::env::var("OUTPOST_KNOWN_HOSTS") {
            return Ok(Self::with_path(PathBuf::from(val)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".ssh").join("known_hosts")))
    }

    /// Creates a manager pointing at an arbitrary path (for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if some entry names `host` in plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn contains(&self, host: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        Ok(content.lines().any(|line| entry_names(line, host)))
    }

    /// Appends `entries` that are not already present, creating the file
    /// (600) and its parent directory (700) as needed. Returns how many
    /// lines were written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, written, or chmod-ed.
    pub fn append(&self, entries: &[&str]) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create dir {}", parent.display()))?;
                set_permissions(parent, 0o700)?;
            }
        }

        let existing = if self.path.exists() {
            std::fs::read_to_string(&self.path)
                .with_context(|| format!("read {}", self.path.display()))?
        } else {
            String::new()
        };
        let fresh: Vec<&str> = entries
            .iter()
            .copied()
            .filter(|e| !existing.lines().any(|l| l == *e))
            .collect();
        if fresh.is_empty() {
            return Ok(0);
        }

        let created = !self.path.exists();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file).with_context(|| format!("write {}", self.path.display()))?;
        }
        for entry in &fresh {
            writeln!(file, "{entry}").with_context(|| format!("write {}", self.path.display()))?;
        }
        if created {
            set_permissions(&self.path, 0o600)?;
        }
        Ok(fresh.len())
    }
}

/// Whether a known_hosts line's host field lists `host`.
fn entry_names(line: &str, host: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return false;
    }
    line.split_whitespace()
        .next()
        .is_some_and(|hosts| hosts.split(',').any(|h| h == host))
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// `HostRegistry` that asks the host for its keys with `ssh-keyscan`.
pub struct KeyscanRegistry<'a, R: CommandRunner> {
    runner: &'a R,
    known_hosts: &'a KnownHostsManager,
}

impl<'a, R: CommandRunner> KeyscanRegistry<'a, R> {
    /// Register hosts into `known_hosts`, scanning through `runner`.
    pub fn new(runner: &'a R, known_hosts: &'a KnownHostsManager) -> Self {
        Self {
            runner,
            known_hosts,
        }
    }
}

impl<R: CommandRunner> HostRegistry for KeyscanRegistry<'_, R> {
    async fn register(&self, host: &str) -> Result<bool> {
        let output = self
            .runner
            .run("ssh-keyscan", &[host.to_string()])
            .await
            .context("ssh-keyscan")?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries: Vec<&str> = stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        if entries.is_empty() {
            return Ok(false);
        }
        let written = self.known_hosts.append(&entries)?;
        tracing::debug!(host, written, path = %self.known_hosts.path().display(), "host keys registered");
        Ok(true)
    }
}
