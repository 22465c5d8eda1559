//! Unit tests for the outpost CLI
//!
//! These tests drive services and command handlers through a scripted
//! `CommandRunner`, so no external program is ever spawned.

mod architecture;
mod helpers;
mod instance_service;
mod remote_service;
