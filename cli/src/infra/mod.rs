//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, settings
//! files, the AWS CLI, SSH transports, known-hosts and terminal prompts.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws;
pub mod command_runner;
pub mod env_file;
pub mod known_hosts;
pub mod prompt;
pub mod remote;
