//! Spinner shown while a long remote step runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: [&str; 11] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

/// Start a spinner labelled `msg`, with elapsed time, ticking every 80ms.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("  {spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&TICKS);
    let pb = ProgressBar::new_spinner().with_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
