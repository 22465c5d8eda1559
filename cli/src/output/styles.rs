//! Glyphs and colors for status lines.

use owo_colors::Style;

/// Kind of status line a command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Success,
    Warning,
    Error,
    Info,
    Step,
}

impl Mark {
    /// Leading symbol, printed before the message.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::Info => "ℹ",
            Self::Step => "→",
        }
    }
}

/// Stylesheet. Every entry renders plain until [`Styles::colorize`].
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub step: Style,
    /// Summary keys such as `id` and `host`.
    pub dim: Style,
    pub header: Style,
}

impl Styles {
    /// Switch on ANSI colors.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.step = Style::new().cyan();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold().cyan();
    }

    /// Style for the glyph of `mark`.
    #[must_use]
    pub fn for_mark(&self, mark: Mark) -> Style {
        match mark {
            Mark::Success => self.success,
            Mark::Warning => self.warning,
            Mark::Error => self.error,
            Mark::Info => self.info,
            Mark::Step => self.step,
        }
    }
}
