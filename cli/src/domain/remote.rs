//! Remote connection parameters and the argument lists handed to `ssh`,
//! `scp`, `rsync` and `unison`.
//!
//! Pure functions only: nothing here spawns a process.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::config::{Settings, keys};

/// Remote file that sshd reads user environment variables from.
pub const REMOTE_ENVIRONMENT_FILE: &str = ".ssh/environment";

/// sshd directive that makes it honour [`REMOTE_ENVIRONMENT_FILE`].
pub const PERMIT_USER_ENVIRONMENT: &str = "PermitUserEnvironment yes";

/// Remote sshd configuration file.
pub const SSHD_CONFIG: &str = "/etc/ssh/sshd_config";

/// Everything needed to reach the instance over SSH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    /// Login user, e.g. `ubuntu`.
    pub user: String,
    /// Public hostname of the instance.
    pub host: String,
    /// Private key matching the instance key pair.
    pub key_file: PathBuf,
    /// Application directory on the instance.
    pub app_dir: String,
}

impl SshTarget {
    /// Build a target from resolved settings.
    ///
    /// The key file is `<ssh_dir>/<KEYPAIR>.pem`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no instance, no hostname or no key pair.
    pub fn from_settings(settings: &Settings, ssh_dir: &Path) -> Result<Self> {
        let instance = settings.require_instance()?;
        let host = instance.require_hostname()?.to_string();
        let keypair = settings.require(keys::KEYPAIR)?;
        Ok(Self {
            user: settings.get(keys::INSTANCE_USER).to_string(),
            host,
            key_file: ssh_dir.join(format!("{keypair}.pem")),
            app_dir: settings.get(keys::APP_DIR).to_string(),
        })
    }

    /// `user@host`.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    fn key(&self) -> String {
        self.key_file.display().to_string()
    }

    /// `ssh` invocation running `remote_cmd`, with a pseudo-terminal when `tty`.
    #[must_use]
    pub fn ssh_args(&self, remote_cmd: &str, tty: bool) -> Vec<String> {
        let mut args = vec!["-i".to_string(), self.key()];
        if tty {
            args.push("-t".to_string());
        }
        args.push(self.destination());
        args.push(remote_cmd.to_string());
        args
    }

    /// Shell line that runs `cmd` inside the app directory, or a login shell
    /// there when `cmd` is `None`.
    ///
    /// The directory is quoted; `cmd` is passed through as shell text.
    #[must_use]
    pub fn in_app_dir(&self, cmd: Option<&str>) -> String {
        match cmd {
            Some(cmd) => format!("cd {} && {cmd}", shell_quote(&self.app_dir)),
            None => format!("cd {}; exec $SHELL -l", shell_quote(&self.app_dir)),
        }
    }

    /// `rsync` local → remote, mirroring deletions, skipping dotfiles.
    #[must_use]
    pub fn rsync_push_args(&self) -> Vec<String> {
        let remote = format!("{}:{}/", self.destination(), self.app_dir);
        self.rsync_args("./".to_string(), remote)
    }

    /// `rsync` remote → local, the mirror of [`SshTarget::rsync_push_args`].
    #[must_use]
    pub fn rsync_pull_args(&self) -> Vec<String> {
        let remote = format!("{}:{}/", self.destination(), self.app_dir);
        self.rsync_args(remote, "./".to_string())
    }

    fn rsync_args(&self, from: String, to: String) -> Vec<String> {
        vec![
            "-az".to_string(),
            "--delete".to_string(),
            "--itemize-changes".to_string(),
            "--exclude".to_string(),
            ".*".to_string(),
            "-e".to_string(),
            format!("ssh -i {}", self.key()),
            from,
            to,
        ]
    }

    /// `unison` two-way sync, newer copy wins, never prompts.
    #[must_use]
    pub fn unison_args(&self) -> Vec<String> {
        vec![
            ".".to_string(),
            format!("ssh://{}/{}", self.destination(), self.app_dir),
            "-batch".to_string(),
            "-auto".to_string(),
            "-terse".to_string(),
            "-prefer".to_string(),
            "newer".to_string(),
            "-times".to_string(),
            "-ignore".to_string(),
            "Name .*".to_string(),
            "-sshargs".to_string(),
            format!("-i {}", self.key()),
        ]
    }

    /// `scp` of one local file to `remote_path` (relative to the login home).
    #[must_use]
    pub fn scp_args(&self, local: &Path, remote_path: &str) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.key(),
            local.display().to_string(),
            format!("{}:{remote_path}", self.destination()),
        ]
    }
}

/// Quote `word` for a POSIX shell so it stays one argument.
///
/// Words made only of characters the shell treats literally are returned
/// as-is; anything else is single-quoted.
#[must_use]
pub fn shell_quote(word: &str) -> String {
    let literal = |c: char| c.is_ascii_alphanumeric() || "_-./:@,+%=".contains(c);
    if !word.is_empty() && word.chars().all(literal) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Contents for [`REMOTE_ENVIRONMENT_FILE`], plus keys that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshEnvironment {
    /// One `KEY=value` line per setting.
    pub contents: String,
    /// Keys whose value spans several lines.
    pub skipped: Vec<String>,
}

/// Render parsed settings the way sshd reads its environment file.
///
/// sshd takes everything after the first `=` literally and has no quoting
/// or `export` syntax, so values are written bare. A line break cannot be
/// represented; those keys are left out and reported.
#[must_use]
pub fn ssh_environment(pairs: &[(String, String)]) -> SshEnvironment {
    let mut env = SshEnvironment {
        contents: String::new(),
        skipped: Vec::new(),
    };
    for (key, value) in pairs {
        if value.contains(['\n', '\r']) {
            env.skipped.push(key.clone());
            continue;
        }
        env.contents.push_str(&format!("{key}={value}\n"));
    }
    env
}

/// Remote check for the sshd user-environment directive.
#[must_use]
pub fn user_environment_check() -> String {
    format!("grep -qx '{PERMIT_USER_ENVIRONMENT}' {SSHD_CONFIG}")
}

/// Remote command enabling the directive and restarting sshd.
#[must_use]
pub fn user_environment_enable() -> String {
    format!(
        "echo '{PERMIT_USER_ENVIRONMENT}' | sudo tee -a {SSHD_CONFIG} > /dev/null && sudo systemctl restart ssh"
    )
}
