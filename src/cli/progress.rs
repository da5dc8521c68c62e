use indicatif::{ProgressBar, ProgressStyle};

use crate::downloader::ProgressReporter;

/// Download progress rendered as an indicatif bar.
pub struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.blue/white} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { pb }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn update(&mut self, percent: u8, message: &str) {
        self.pb.set_position(percent as u64);
        self.pb.set_message(message.to_string());
    }

    fn finish(&mut self) {
        self.pb.finish_and_clear();
    }
}
