//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision a cloud dev instance, deploy to it, keep it in sync
#[derive(Parser)]
#[command(
    name = "outpost",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Project settings file
    #[arg(
        long,
        global = true,
        env = "OUTPOST_ENV_FILE",
        default_value = ".env",
        value_name = "PATH"
    )]
    pub env_file: PathBuf,

    /// Answer yes to confirmation prompts
    #[arg(
        short = 'y',
        long,
        global = true,
        env = "OUTPOST_YES",
        value_parser = FalseyValueParser::new()
    )]
    pub yes: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the deploy script on the instance
    Deploy,

    /// Terminate the instance
    Down,

    /// Copy the project settings to the instance's ssh environment
    Env,

    /// Refresh the instance hostname and trust its host keys
    Host,

    /// Run the install script on the instance
    Install,

    /// Copy the app directory from the instance (remote → local)
    Pull,

    /// Copy the working directory to the instance (local → remote)
    Push,

    /// Open a shell, or run a command, in the app directory
    Ssh(commands::ssh::SshArgs),

    /// Two-way sync between the working directory and the instance
    Sync,

    /// Launch and set up a new instance
    Up,

    /// Sync every few seconds and deploy when files change
    Watch,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            env_file,
            yes,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        let mut app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
            env_file,
        })?;
        commands::dispatch(&mut app, command).await
    }
}
