//! Spinner feedback while mapping tables load.
//!
//! Nothing is drawn when --quiet is set.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Start a spinner with a message, or `None` when quiet.
pub fn spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(style("{spinner:.cyan} {msg}").tick_chars(TICK_CHARS));
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn finish_with(pb: Option<ProgressBar>, template: &str, mark: &'static str, message: &str) {
    if let Some(pb) = pb {
        pb.set_style(style(template));
        pb.set_prefix(mark);
        pb.finish_with_message(message.to_string());
    }
}

/// Finish a spinner with a success message
pub fn finish_spinner(pb: Option<ProgressBar>, message: &str) {
    finish_with(pb, "{prefix:.green} {msg}", "✓", message);
}

/// Finish a spinner with an error message
pub fn finish_spinner_error(pb: Option<ProgressBar>, message: &str) {
    finish_with(pb, "{prefix:.red} {msg}", "✗", message);
}
