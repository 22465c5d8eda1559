//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Precondition errors ───────────────────────────────────────────────────────

/// A command was invoked without the state it needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("No instance. Run 'outpost up' first.")]
    NoInstance,

    #[error("No hostname recorded for instance {0}. Run 'outpost host'.")]
    NoHostname(String),

    #[error("{0} is not set. Add it to the project .env or ~/.outpost/defaults.env")]
    MissingSetting(String),
}

// ── Provider errors ───────────────────────────────────────────────────────────

/// The cloud CLI answered with something we could not use.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unexpected response from aws: {0}")]
    MalformedResponse(String),

    #[error("aws response has no {0}")]
    MissingField(&'static str),
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors related to settings key/value validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid setting name: {0:?}")]
    InvalidKey(String),

    #[error("Value for {0} must be a single line")]
    MultilineValue(String),
}
