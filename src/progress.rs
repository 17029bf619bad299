use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Receives transfer progress from the download loop.
pub trait ProgressObserver: Send + Sync {
    /// Called once before the first chunk; `None` when the size is unknown.
    fn start(&self, total: Option<u64>);
    /// Bytes written since the previous call.
    fn advance(&self, delta: u64);
    fn finish(&self);
}

/// Terminal progress bar, degrading to a byte counter without a total.
pub struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    pub fn new(version: &str, hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_message(format!("Downloading {}", style(version).green()));
        Self { bar }
    }

    /// Leaves the bar where it stopped, e.g. on Ctrl-C.
    pub fn abandon(&self) {
        self.bar.abandon_with_message("Download interrupted");
    }
}

impl ProgressObserver for DownloadBar {
    fn start(&self, total: Option<u64>) {
        let template = match total {
            Some(total) => {
                self.bar.set_length(total);
                ProgressStyle::default_bar()
                    .template("{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .map(|s| s.progress_chars("#>-"))
            }
            None => ProgressStyle::default_spinner()
                .template("{msg} {spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})"),
        };
        match template {
            Ok(template) => self.bar.set_style(template),
            Err(e) => tracing::debug!("Invalid progress template: {}", e),
        }
    }

    fn advance(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self) {
        self.bar.finish_with_message("Download complete");
    }
}
