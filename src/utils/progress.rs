//! Spinner shown while the launcher is busy.
//!
//! Wraps an `indicatif` spinner and hides it when progress output is disabled
//! through `--no-progress` or the `JARLAUNCH_NO_PROGRESS` environment variable.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Environment variable that disables animated output when set.
pub const NO_PROGRESS_ENV: &str = "JARLAUNCH_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// Spinner for one transient state; cleared when finished or dropped.
pub struct Spinner {
    inner: ProgressBar,
}

impl Spinner {
    /// Start a spinner, or a hidden one when progress output is disabled.
    pub fn start(enabled: bool, message: impl Into<String>) -> Self {
        let inner = if enabled && !is_progress_disabled() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        inner.set_message(message.into());
        Self { inner }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.set_message(message.into());
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    pub fn finish(self) {
        self.inner.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.inner.is_finished() {
            self.inner.finish_and_clear();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
}
