//! Progress bar for merge runs.
//!
//! The bar is driven by [`MergeProgress`] updates received from a
//! [`MergeTask`](crate::merge::MergeTask); it draws on stderr and only when
//! stderr is a terminal.
//!
//! # Examples
//!
//! ```
//! use doccat::merge::MergeProgress;
//! use doccat::output::progress::ProgressBar;
//!
//! let mut bar = ProgressBar::new(2);
//! bar.set_message("Merging");
//! bar.update(MergeProgress::new(1, 2));
//! bar.update(MergeProgress::new(2, 2));
//! bar.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::merge::MergeProgress;

const BAR_WIDTH: usize = 40;

/// Progress bar for visual feedback during a merge.
#[derive(Debug)]
pub struct ProgressBar {
    /// Last update received.
    state: MergeProgress,
    /// Optional message to display.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Whether the progress bar draws anything.
    enabled: bool,
}

impl ProgressBar {
    /// Create a progress bar for `total` inputs.
    pub fn new(total: usize) -> Self {
        Self {
            state: MergeProgress {
                completed: 0,
                total,
                percent: 0,
            },
            message: None,
            start_time: Instant::now(),
            enabled: io::stderr().is_terminal(),
        }
    }

    /// Create a progress bar that never draws.
    pub fn disabled(total: usize) -> Self {
        Self {
            enabled: false,
            ..Self::new(total)
        }
    }

    /// Set the message shown in front of the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Record an update and redraw.
    pub fn update(&mut self, progress: MergeProgress) {
        self.state = progress;
        self.draw();
    }

    /// Last reported percentage.
    pub fn percent(&self) -> u8 {
        self.state.percent
    }

    /// Inputs merged so far.
    pub fn completed(&self) -> usize {
        self.state.completed
    }

    /// Get the elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// End the bar's line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.draw();
            eprintln!();
        }
    }

    /// Erase the bar, e.g. before printing an error.
    pub fn clear(&self) {
        if self.enabled {
            eprint!("\r\x1b[K");
            io::stderr().flush().ok();
        }
    }

    fn draw(&self) {
        if !self.enabled {
            return;
        }
        eprint!("\r{}", self.render());
        io::stderr().flush().ok();
    }

    /// The text of the bar in its current state.
    pub fn render(&self) -> String {
        let filled = BAR_WIDTH * usize::from(self.state.percent) / 100;
        let head = if filled > 0 && filled < BAR_WIDTH { ">" } else { "" };
        let body = "=".repeat(filled.saturating_sub(head.len()));
        let bar = format!("[{body}{head}{}]", " ".repeat(BAR_WIDTH - filled));

        let mut parts = vec![
            bar,
            format!("{:>3}%", self.state.percent),
            format!("{}/{}", self.state.completed, self.state.total),
            format_duration(self.elapsed()),
        ];
        if let Some(message) = &self.message {
            parts.insert(0, message.clone());
        }
        parts.join(" ")
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
