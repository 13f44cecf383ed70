//! Reporting surface consumed by the presentation layer, plus the message
//! formatting helpers it shares with hosts.

use heic2jpeg_core::error::RejectReason;
use heic2jpeg_core::models::CandidateFile;

/// Presentation-layer callbacks. Implementations must be cheap; they run
/// inline between per-file conversion steps.
pub trait ConversionReporter: Send + Sync {
    /// Called after every per-file outcome (and before each file starts).
    fn on_progress(&self, percent: u8, message: &str);

    fn on_run_complete(&self, success_count: usize, total_count: usize, failures: &[String]);

    fn on_admission_rejected(&self, reason: RejectReason, names: &[String]);
}

/// Default reporter that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ConversionReporter for TracingReporter {
    fn on_progress(&self, percent: u8, message: &str) {
        tracing::info!(percent = percent, "{}", message);
    }

    fn on_run_complete(&self, success_count: usize, total_count: usize, failures: &[String]) {
        if failures.is_empty() {
            tracing::info!(
                success = success_count,
                total = total_count,
                "conversion run complete"
            );
        } else {
            tracing::warn!(
                success = success_count,
                total = total_count,
                failures = failures.len(),
                "conversion run complete with failures"
            );
        }
    }

    fn on_admission_rejected(&self, reason: RejectReason, names: &[String]) {
        tracing::warn!(reason = ?reason, files = %preview_names(names), "files rejected at admission");
    }
}

/// Reporter that drops everything. Useful in tests and headless embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ConversionReporter for NullReporter {
    fn on_progress(&self, _percent: u8, _message: &str) {}
    fn on_run_complete(&self, _success_count: usize, _total_count: usize, _failures: &[String]) {}
    fn on_admission_rejected(&self, _reason: RejectReason, _names: &[String]) {}
}

/// Preview of rejected file names: first three, plus a count of the rest.
pub fn preview_names(names: &[String]) -> String {
    let shown = names
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > 3 {
        format!("{} and {} more", shown, names.len() - 3)
    } else {
        shown
    }
}

/// Status line shown while a file converts: "Converting 2 of 5: x.heic (1.85 MB)..."
pub fn converting_message(index: usize, total: usize, file: &CandidateFile) -> String {
    format!(
        "Converting {} of {}: {} ({:.2} MB)...",
        index + 1,
        total,
        file.name,
        file.size_mb()
    )
}

/// Human-readable byte size with up to two decimals: "0 Bytes", "1.5 KB",
/// "2 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = (bytes as f64 / 1024f64.powi(exp as i32) * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[exp])
}
