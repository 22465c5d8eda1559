//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the top-level flags and the
//! two settings files, then handed to the selected command. Generic over the
//! `CommandRunner` so tests can drive commands with a scripted runner.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{CommandRunner, Confirm};
use crate::domain::Settings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::env_file::{self, EnvFile};
use crate::infra::known_hosts::KnownHostsManager;
use crate::infra::prompt::{AssumeYes, DialoguerConfirm};
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Answer "yes" to every confirmation prompt.
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Project settings file.
    pub env_file: PathBuf,
}

/// Unified application context passed to every command handler.
pub struct AppContext<R: CommandRunner = TokioCommandRunner> {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Resolved settings: defaults, then global file, then project file.
    pub settings: Settings,
    /// The project settings file, where instance state is persisted.
    pub store: EnvFile,
    /// Spawns every external program.
    pub runner: R,
    /// Where new host keys are trusted.
    pub known_hosts: KnownHostsManager,
    /// Directory holding `<KEYPAIR>.pem`.
    pub ssh_dir: PathBuf,
    /// Yes/no prompts.
    pub prompt: Box<dyn Confirm>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or a
    /// settings file exists but cannot be parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        let store = EnvFile::new(&flags.env_file);
        let global = EnvFile::new(env_file::global_path()?);
        let settings = env_file::load_settings(Some(&global), &store)?;
        tracing::debug!(project = %flags.env_file.display(), "settings loaded");

        let prompt: Box<dyn Confirm> = if flags.behaviour.yes {
            Box::new(AssumeYes)
        } else {
            Box::new(DialoguerConfirm)
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            settings,
            store,
            runner: TokioCommandRunner,
            known_hosts: KnownHostsManager::new()?,
            ssh_dir: home.join(".ssh"),
            prompt,
        })
    }
}

impl<R: CommandRunner> AppContext<R> {
    /// Ask the user for confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompt.confirm(prompt)
    }
}
