//! Download progress bars backed by indicatif.

use fetchkit::{ProgressHandle, ProgressSink};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {bytes} ({bytes_per_sec}) {msg}";

/// Progress sink drawing one bar per download
///
/// Downloads without a known size get a spinner instead of a bar.
pub struct BarProgress {
    multi: MultiProgress,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        let multi = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self { multi }
    }
}

impl ProgressSink for BarProgress {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle> {
        let bar = if total > 0 {
            ProgressBar::new(total).with_style(bar_style())
        } else {
            let spinner = ProgressBar::new_spinner().with_style(spinner_style());
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        };
        let bar = self.multi.add(bar);
        bar.set_message(short_label(label).to_string());
        Box::new(BarHandle(bar))
    }
}

struct BarHandle(ProgressBar);

impl ProgressHandle for BarHandle {
    fn advance(&mut self, bytes: u64) {
        self.0.inc(bytes);
    }

    fn finish(&mut self) {
        self.0.finish();
    }

    fn abandon(&mut self) {
        self.0.abandon_with_message("failed");
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Last path segment of a URL, for the bar message
fn short_label(label: &str) -> &str {
    label
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label() {
        assert_eq!(
            short_label("https://dldir1v6.qq.com/qqfile/qq/QQNT/Linux/QQ_3.2.21_251114_arm64_01.deb"),
            "QQ_3.2.21_251114_arm64_01.deb"
        );
        assert_eq!(short_label("NapCat.Shell.zip"), "NapCat.Shell.zip");
        assert_eq!(short_label("https://example.com/dl/"), "dl");
    }

    #[test]
    fn test_templates_parse() {
        assert!(ProgressStyle::with_template(BAR_TEMPLATE).is_ok());
        assert!(ProgressStyle::with_template(SPINNER_TEMPLATE).is_ok());
    }

    #[test]
    fn test_hidden_sink_handles_both_modes() {
        let sink = BarProgress::new(true);

        let mut sized = sink.start("https://example.com/a.zip", 10);
        sized.advance(4);
        sized.advance(6);
        sized.finish();

        let mut unsized_handle = sink.start("https://example.com/b.zip", 0);
        unsized_handle.advance(3);
        unsized_handle.abandon();
    }
}
