//! Domain types and validators for Outpost settings.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::error::{PreconditionError, SettingsError};
use crate::domain::instance::InstanceRef;

// ── Keys ─────────────────────────────────────────────────────────────────────

/// Setting names recognised by the tool.
pub mod keys {
    pub const AMI: &str = "AMI";
    pub const APP_DIR: &str = "APP_DIR";
    pub const DEPLOY_SCRIPT: &str = "DEPLOY_SCRIPT";
    pub const INSTALL_SCRIPT: &str = "INSTALL_SCRIPT";
    pub const INSTANCE_TYPE: &str = "INSTANCE_TYPE";
    pub const INSTANCE_USER: &str = "INSTANCE_USER";
    pub const INSTANCE_ID: &str = "INSTANCE_ID";
    pub const INSTANCE_HOSTNAME: &str = "INSTANCE_HOSTNAME";
    pub const INSTANCE_NAME: &str = "INSTANCE_NAME";
    pub const KEYPAIR: &str = "KEYPAIR";
    pub const SUBNET: &str = "SUBNET";
}

/// Built-in defaults, lowest priority in the merge.
pub const DEFAULTS: &[(&str, &str)] = &[
    (keys::AMI, "ami-0c7217cdde317cfec"),
    (keys::APP_DIR, "app"),
    (keys::DEPLOY_SCRIPT, "deploy.sh"),
    (keys::INSTALL_SCRIPT, "install.sh"),
    (keys::INSTANCE_TYPE, "t3.micro"),
    (keys::INSTANCE_USER, "ubuntu"),
];

/// Names accepted in a settings file: shell-style identifiers.
pub static SETTING_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex")
});

// ── Settings ─────────────────────────────────────────────────────────────────

/// Resolved runtime configuration for one invocation.
///
/// Built once at startup from defaults, the global file and the project file
/// (later layers win), then handed to every command by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            values: DEFAULTS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl Settings {
    /// Overlay `pairs` on top of the current values.
    pub fn overlay<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            self.values.insert(k.into(), v.into());
        }
    }

    /// Raw value, empty when the key was never set.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Value if set to something non-empty.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        Some(self.get(key)).filter(|v| !v.is_empty())
    }

    /// Record a value in memory (persisting is the caller's job).
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Value of a setting the current command cannot run without.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::MissingSetting` if the key is unset or empty.
    pub fn require(&self, key: &str) -> Result<&str, PreconditionError> {
        self.non_empty(key)
            .ok_or_else(|| PreconditionError::MissingSetting(key.to_string()))
    }

    /// The currently recorded instance, if any.
    ///
    /// A hostname on its own does not make an instance reference.
    #[must_use]
    pub fn instance(&self) -> Option<InstanceRef> {
        let id = self.non_empty(keys::INSTANCE_ID)?;
        Some(InstanceRef {
            id: id.to_string(),
            hostname: self.non_empty(keys::INSTANCE_HOSTNAME).map(String::from),
        })
    }

    /// Like [`Settings::instance`] but failing when there is none.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::NoInstance` when `INSTANCE_ID` is empty.
    pub fn require_instance(&self) -> Result<InstanceRef, PreconditionError> {
        self.instance().ok_or(PreconditionError::NoInstance)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a setting name before it is written to a settings file.
///
/// # Errors
///
/// Returns an error if the key is not a shell-style identifier.
pub fn validate_setting_key(key: &str) -> Result<()> {
    if !SETTING_KEY_RE.is_match(key) {
        return Err(SettingsError::InvalidKey(key.to_string()).into());
    }
    Ok(())
}

/// Validates a setting value: it must fit on one line.
///
/// # Errors
///
/// Returns an error if the value contains a line break.
pub fn validate_setting_value(key: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(SettingsError::MultilineValue(key.to_string()).into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
