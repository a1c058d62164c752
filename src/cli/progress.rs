//! Terminal progress helpers: spinners and status indicators.
//!
//! Uses `indicatif` to show animated spinners while views load and while
//! uploaded documents are being processed.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

// ── Spinner presets ──────────────────────────────────

/// Braille dots.
const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars(TICK_CHARS)
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn finished_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Create an animated spinner with the given message.
///
/// Call one of the helpers (`finish_success`, `finish_error`) when done.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Spinner for a view load ("Loading documents...").
pub fn loading_spinner(what: &str) -> ProgressBar {
    spinner(&format!("Loading {}...", what))
}

/// One spinner per processing document, stacked under `multi`.
pub fn processing_spinner(multi: &MultiProgress, document_name: &str) -> ProgressBar {
    let pb = multi.add(ProgressBar::new_spinner());
    pb.set_style(spinner_style());
    pb.set_message(format!("{} {}: processing", status_icon("processing"), document_name));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Summary line above the per-document spinners.
pub fn processing_summary(multi: &MultiProgress, total: usize) -> ProgressBar {
    let pb = multi.insert(0, ProgressBar::new_spinner());
    pb.set_style(spinner_style());
    pb.set_message(format!("0/{} processed", total));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── Finish helpers ───────────────────────────────────

/// Finish a spinner with a green check-mark.
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.set_style(finished_style());
    pb.finish_with_message(format!("✓ {}", msg));
}

/// Finish a spinner with a red cross.
pub fn finish_error(pb: &ProgressBar, msg: &str) {
    pb.set_style(finished_style());
    pb.finish_with_message(format!("✗ {}", msg));
}

/// Finish a spinner with a neutral marker (budget exhausted, cancelled).
pub fn finish_neutral(pb: &ProgressBar, msg: &str) {
    pb.set_style(finished_style());
    pb.finish_with_message(format!("◷ {}", msg));
}

// ── Status icons ─────────────────────────────────────

/// Icon for a document, conflict, or change status string.
pub fn status_icon(status: &str) -> &'static str {
    match status {
        "ready" | "resolved" => "✓",
        "error" | "high" => "✗",
        "processing" => "⟳",
        "active" | "medium" => "!",
        "dismissed" | "low" => "·",
        _ => "?",
    }
}
