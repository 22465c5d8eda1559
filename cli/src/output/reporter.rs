//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY, `step()` starts a spinner that the next message replaces;
/// otherwise it prints `"  → {message}"`. Everything except `error()` is
/// suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.clear_spinner();
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.ctx.step(message);
        }
    }

    fn success(&self, message: &str) {
        self.clear_spinner();
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.clear_spinner();
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        self.clear_spinner();
        self.ctx.error(message);
    }
}
