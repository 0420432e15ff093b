//! CLI command implementations.

pub mod chat;
pub mod draft;
pub mod init;
pub mod review;
pub mod status;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner-style progress bar for generation calls
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
