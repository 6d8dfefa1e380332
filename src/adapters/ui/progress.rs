//! Implements ProgressPort with an indicatif spinner.

use crate::ports::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

/// Indeterminate spinner shown while a request is in flight.
pub struct SpinnerProgress {
    bar: Mutex<Option<ProgressBar>>,
    message: String,
}

impl SpinnerProgress {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            bar: Mutex::new(None),
            message: message.into(),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.magenta} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new("Working...")
    }
}

impl ProgressPort for SpinnerProgress {
    fn start(&self) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            previous.finish_and_clear();
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(self.message.clone());
        bar.enable_steady_tick(TICK);
        *slot = Some(bar);
    }

    fn complete(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

/// Progress port that draws nothing.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressPort for NoopProgress {
    fn start(&self) {}

    fn complete(&self) {}
}
