//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod config_service;
pub mod instance;
pub mod remote;
pub mod watch;

use std::process::Output;

/// Trimmed stderr of a finished process, or its exit status when it was silent.
#[must_use]
pub fn stderr_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}
