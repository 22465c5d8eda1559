//! Application service: settings use-cases.

use anyhow::Result;

use crate::application::ports::SettingsStore;
use crate::domain::config::{Settings, validate_setting_key, validate_setting_value};

/// Write `key=value` to the project file and to the in-memory settings, so
/// later steps of the same command see the new value.
///
/// # Errors
///
/// Returns an error if the key or value is invalid or the file write fails.
/// On error the in-memory settings are left unchanged.
pub fn persist(
    settings: &mut Settings,
    store: &impl SettingsStore,
    key: &str,
    value: &str,
) -> Result<()> {
    validate_setting_key(key)?;
    validate_setting_value(key, value)?;
    store.upsert(key, value)?;
    settings.set(key, value);
    Ok(())
}
