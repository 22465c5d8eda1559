//! Flat `KEY=value` settings files: loading and in-place upsert.
//!
//! Parsing is delegated to `dotenvy`. Writing is line-based so comments,
//! blank lines and unrelated keys survive untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::SettingsStore;
use crate::domain::config::Settings;

/// Project settings file name, looked up in the working directory.
pub const PROJECT_FILE: &str = ".env";

/// A settings file on disk. It need not exist yet.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    /// Point at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for EnvFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_pairs(&self) -> Result<Vec<(String, String)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        dotenvy::from_path_iter(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?
            .map(|item| item.with_context(|| format!("cannot parse {}", self.path.display())))
            .collect()
    }

    fn upsert(&self, key: &str, value: &str) -> Result<()> {
        let content = if self.path.exists() {
            std::fs::read_to_string(&self.path)
                .with_context(|| format!("cannot read {}", self.path.display()))?
        } else {
            String::new()
        };

        let updated = upsert_line(&content, key, value);

        // Atomic write via temp file then rename
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| PROJECT_FILE.to_string());
        let temp_path = self.path.with_file_name(format!("{file_name}.tmp"));
        std::fs::write(&temp_path, updated)
            .with_context(|| format!("cannot write {}", temp_path.display()))?;
        if let Ok(meta) = std::fs::metadata(&self.path) {
            std::fs::set_permissions(&temp_path, meta.permissions())
                .with_context(|| format!("cannot set permissions on {}", temp_path.display()))?;
        }
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), key, "setting persisted");
        Ok(())
    }
}

/// Location of the user-global defaults (`OUTPOST_CONFIG` overrides).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn global_path() -> Result<PathBuf> {
    if let Ok(val) = std::env::var("OUTPOST_CONFIG") {
        return Ok(PathBuf::from(val));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".outpost").join("defaults.env"))
}

/// Merge built-in defaults, the global file and the project file.
///
/// # Errors
///
/// Returns an error if either file exists but cannot be parsed.
pub fn load_settings(global: Option<&EnvFile>, project: &EnvFile) -> Result<Settings> {
    let mut settings = Settings::default();
    if let Some(global) = global {
        settings.overlay(global.read_pairs()?);
    }
    settings.overlay(project.read_pairs()?);
    Ok(settings)
}

// ── Line editing ──────────────────────────────────────────────────────────────

/// Key defined by a settings line, if it defines one.
fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, _) = body.split_once('=')?;
    Some(key.trim())
}

/// Render a value so `dotenvy` reads it back verbatim.
fn quote_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_-./:@,+%".contains(c));
    if plain {
        value.to_string()
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$");
        format!("\"{escaped}\"")
    }
}

/// Replace the value of every line defining `key`, or append one line.
#[must_use]
pub fn upsert_line(content: &str, key: &str, value: &str) -> String {
    let rendered = format!("{key}={}", quote_value(value));
    let mut found = false;
    let mut out = String::with_capacity(content.len() + rendered.len() + 1);

    for line in content.lines() {
        if line_key(line) == Some(key) {
            found = true;
            if line.trim_start().starts_with("export ") {
                out.push_str("export ");
            }
            out.push_str(&rendered);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    if !found {
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}
