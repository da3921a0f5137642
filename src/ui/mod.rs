use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use crate::domain::{DownloadEvent, PageKind};

/// Renders download events to the terminal: one status line per outcome and
/// a byte progress bar while a file is streaming.
pub struct ConsoleReporter {
    draw_target: fn() -> ProgressDrawTarget,
    /// File currently streaming and its bar.
    bar: Option<(String, ProgressBar)>,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            draw_target: ProgressDrawTarget::stderr,
            bar: None,
        }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            draw_target: ProgressDrawTarget::hidden,
            bar: None,
        }
    }

    pub fn handle(&mut self, event: DownloadEvent) {
        match &event {
            DownloadEvent::Started { file_name, total } => {
                self.clear_bar();
                self.bar = Some((file_name.clone(), self.new_bar(file_name, *total)));
            }
            DownloadEvent::Progress {
                file_name,
                downloaded,
            } => match &self.bar {
                Some((active, bar)) if active == file_name => bar.set_position(*downloaded),
                _ => debug!(file_name = %file_name, "progress for a file without a bar"),
            },
            _ => {
                self.clear_bar();
                match &event {
                    DownloadEvent::Completed {
                        file_name,
                        path,
                        bytes,
                    } => debug!(path = %path.display(), bytes, "saved {file_name}"),
                    DownloadEvent::PageFailed { url, .. } => debug!(%url, "page skipped"),
                    _ => {}
                }
                if let Some(line) = status_line(&event) {
                    println!("{line}");
                }
            }
        }
    }

    fn new_bar(&self, file_name: &str, total: Option<u64>) -> ProgressBar {
        let bar = match total {
            Some(total) if total > 0 => {
                let bar = ProgressBar::with_draw_target(Some(total), (self.draw_target)());
                bar.set_style(
                    ProgressStyle::with_template(
                        "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} ({eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
                );
                bar
            }
            _ => {
                let bar = ProgressBar::with_draw_target(None, (self.draw_target)());
                bar.set_style(
                    ProgressStyle::with_template("{spinner} {msg} {bytes} {bytes_per_sec}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message(format!("Downloading {file_name}"));
        bar
    }

    fn clear_bar(&mut self) {
        if let Some((_, bar)) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// The line printed for an event, if any.
pub fn status_line(event: &DownloadEvent) -> Option<String> {
    match event {
        DownloadEvent::PageFailed {
            kind: PageKind::Index,
            error,
            ..
        } => Some(format!("Failed to fetch URL: {error}")),
        DownloadEvent::PageFailed {
            kind: PageKind::Linked,
            error,
            ..
        } => Some(format!("Failed to fetch linked page URL: {error}")),
        DownloadEvent::Skipped { file_name } => {
            Some(format!("Skipped: {file_name} (Already downloaded)"))
        }
        DownloadEvent::Completed { file_name, .. } => Some(format!("Downloaded: {file_name}")),
        DownloadEvent::Failed { file_name, error } => {
            Some(format!("Failed to download {file_name}: {error}"))
        }
        DownloadEvent::Started { .. } | DownloadEvent::Progress { .. } => None,
    }
}
