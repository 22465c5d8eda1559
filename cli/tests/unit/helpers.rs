//! Shared test helpers: a scripted command runner, canned prompts and
//! output constructors.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::process::{ExitCode, ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use outpost_cli::app::AppContext;
use outpost_cli::application::ports::{CommandRunner, Confirm, ProgressReporter};
use outpost_cli::domain::Settings;
use outpost_cli::infra::env_file::EnvFile;
use outpost_cli::infra::known_hosts::KnownHostsManager;
use outpost_cli::output::OutputContext;
use tempfile::TempDir;

pub const HOSTNAME: &str = "ec2-1-2-3-4.compute.amazonaws.com";
pub const HOST_KEY: &str =
    "ec2-1-2-3-4.compute.amazonaws.com ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAITestKey";

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn ok_output_with_stderr(stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub fn describe_json(hostname: &str) -> Vec<u8> {
    format!(r#"{{"Reservations":[{{"Instances":[{{"InstanceId":"i-0abc","PublicDnsName":"{hostname}"}}]}}]}}"#)
        .into_bytes()
}

pub fn launch_json(id: &str) -> Vec<u8> {
    format!(r#"{{"Groups":[],"Instances":[{{"InstanceId":"{id}","State":{{"Name":"pending"}}}}]}}"#)
        .into_bytes()
}

pub fn is_success(code: ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
}

// ── Scripted runner ──────────────────────────────────────────────────────────

/// `CommandRunner` that answers from a queue and records every call.
///
/// An empty queue fails the call, so unexpected spawns surface as errors.
/// The local file handed to `scp` is read at call time, while it exists.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Output>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    uploads: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new(replies: impl IntoIterator<Item = Output>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(p, _)| p).collect()
    }

    /// Contents of every file copied with `scp`, in call order.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn next(&self, program: &str, args: &[String]) -> Result<Output> {
        if program == "scp" && args.len() >= 2 {
            let local = &args[args.len() - 2];
            let contents = std::fs::read_to_string(local).unwrap_or_default();
            self.uploads.lock().unwrap().push(contents);
        }
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        match self.replies.lock().unwrap().pop_front() {
            Some(output) => Ok(output),
            None => anyhow::bail!("unexpected call: {program} {}", args.join(" ")),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        self.next(program, args)
    }

    async fn run_status(&self, program: &str, args: &[String]) -> Result<ExitStatus> {
        self.next(program, args).map(|o| o.status)
    }
}

// ── Prompts and reporters ────────────────────────────────────────────────────

/// Answers every question the same way.
pub struct CannedConfirm(pub bool);

impl Confirm for CannedConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// Collects reported messages as `"<kind>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn has(&self, kind: &str) -> bool {
        let prefix = format!("{kind}: ");
        self.messages.borrow().iter().any(|m| m.starts_with(&prefix))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(format!("error: {message}"));
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// A project directory with a `.env` holding `lines`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(lines: &[&str]) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(dir.path().join(".env"), content).expect("write .env");
        Self { dir }
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn env_path(&self) -> std::path::PathBuf {
        self.dir.path().join(".env")
    }

    pub fn store(&self) -> EnvFile {
        EnvFile::new(self.env_path())
    }

    pub fn env_content(&self) -> String {
        std::fs::read_to_string(self.env_path()).unwrap_or_default()
    }

    pub fn known_hosts_path(&self) -> std::path::PathBuf {
        self.dir.path().join("ssh").join("known_hosts")
    }

    /// Settings as `AppContext::new` would resolve them, minus the global file.
    pub fn settings(&self) -> Settings {
        outpost_cli::infra::env_file::load_settings(None, &self.store()).expect("load settings")
    }

    pub fn app(&self, runner: ScriptedRunner, prompt: CannedConfirm) -> AppContext<ScriptedRunner> {
        AppContext {
            output: OutputContext::new(true, true),
            settings: self.settings(),
            store: self.store(),
            runner,
            known_hosts: KnownHostsManager::with_path(self.known_hosts_path()),
            ssh_dir: self.dir.path().join("ssh"),
            prompt: Box::new(prompt),
        }
    }
}

/// A project with a ready instance.
pub fn ready_project() -> Project {
    Project::new(&[
        "KEYPAIR=dev",
        "SUBNET=subnet-123",
        "INSTANCE_ID=i-0abc",
        &format!("INSTANCE_HOSTNAME={HOSTNAME}"),
    ])
}

pub fn contains_line(path: &Path, line: &str) -> bool {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .any(|l| l == line)
}
