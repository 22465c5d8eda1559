//! Domain layer: pure types, parsers, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod instance;
pub mod remote;
pub mod sync;

pub use config::{Settings, keys, validate_setting_key, validate_setting_value};
pub use error::{PreconditionError, ProviderError, SettingsError};
pub use instance::{InstanceRef, InstanceSpec};
pub use remote::SshTarget;
pub use sync::SyncStrategy;
