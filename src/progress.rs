//! Terminal progress bars.
//!
//! Bars are drawn on stderr, and stay hidden when stderr is not a terminal.
use indicatif::{ProgressBar, ProgressStyle};

/// Bar over a transfer of `len` bytes.
/// Without a known length, only the received bytes are shown.
pub fn bytes(len: Option<u64>, message: &str) -> ProgressBar {
    let bar = match len {
        Some(len) => ProgressBar::new(len).with_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        ),
        None => ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template("{spinner} {msg} {bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        ),
    };
    bar.with_message(message.to_string())
}

/// Bar over `len` units of work.
pub fn items(len: u64, message: &str) -> ProgressBar {
    ProgressBar::new(len)
        .with_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        )
        .with_message(message.to_string())
}
