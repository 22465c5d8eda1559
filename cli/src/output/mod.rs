//! What the user sees on the terminal.
//!
//! Commands print through [`OutputContext`]: one glyph-prefixed line per
//! event, colored only on a TTY without `--no-color`. `--quiet` silences
//! everything but errors, which go to stderr. rsync and unison reports are
//! echoed as-is through [`OutputContext::raw`].

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::{Mark, Styles};

/// Keys in a summary block are padded to this width.
const KV_KEY_WIDTH: usize = 6;

/// Terminal state plus the flags that shape output.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are on only when stdout is a TTY and `no_color` is unset.
    /// `NO_COLOR` reaches here through the `--no-color` flag.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if is_tty && !no_color {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners need a TTY and are hidden by `--quiet`.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Render a status line without printing it.
    #[must_use]
    pub fn format_mark(&self, mark: Mark, msg: &str) -> String {
        format!("  {} {msg}", mark.glyph().style(self.styles.for_mark(mark)))
    }

    /// Print a status line. Errors go to stderr and ignore `--quiet`.
    pub fn mark(&self, mark: Mark, msg: &str) {
        let line = self.format_mark(mark, msg);
        match mark {
            Mark::Error => eprintln!("{line}"),
            _ if self.quiet => {}
            _ => println!("{line}"),
        }
    }

    pub fn success(&self, msg: &str) {
        self.mark(Mark::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.mark(Mark::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.mark(Mark::Error, msg);
    }

    pub fn info(&self, msg: &str) {
        self.mark(Mark::Info, msg);
    }

    pub fn step(&self, msg: &str) {
        self.mark(Mark::Step, msg);
    }

    /// Title over a summary block.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// One `key  value` row of a summary block.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            let key = format!("{key:<KV_KEY_WIDTH$}");
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }

    /// Echo a subprocess report verbatim, ending it with a newline.
    pub fn raw(&self, text: &str) {
        if self.quiet || text.trim().is_empty() {
            return;
        }
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
}
