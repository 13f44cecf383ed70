//! Error taxonomy: admission errors, per-file conversion errors, run errors,
//! and the best-effort classification of decode error text.
//!
//! Per-file errors are always caught at the file boundary and turned into
//! failure records; only `RunError` can abort a run before or during
//! processing.

use thiserror::Error;

/// Why a candidate file was turned away at admission. Non-fatal; reported in
/// aggregate and never affects already-admitted files.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("not a recognized HEIC/HEIF file")]
    WrongFormat,

    #[error("file too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("duplicate of an already selected file")]
    Duplicate,

    #[error("too many files: {existing} selected + {incoming} incoming exceeds limit of {max}")]
    TooManyFiles {
        existing: usize,
        incoming: usize,
        max: usize,
    },
}

/// Machine-readable rejection reason for the reporting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    TooManyFiles,
    WrongFormat,
    TooLarge,
    Duplicate,
}

impl AdmissionError {
    pub fn reason(&self) -> RejectReason {
        match self {
            AdmissionError::WrongFormat => RejectReason::WrongFormat,
            AdmissionError::TooLarge { .. } => RejectReason::TooLarge,
            AdmissionError::Duplicate => RejectReason::Duplicate,
            AdmissionError::TooManyFiles { .. } => RejectReason::TooManyFiles,
        }
    }
}

/// Errors that stop a run from starting or abort it as a whole.
#[derive(Debug, Error)]
pub enum RunError {
    /// The external decode capability is not ready yet. Retryable; distinct
    /// from any conversion error.
    #[error("conversion capability is not ready yet")]
    CapabilityUnavailable,

    /// Something escaped the per-file isolation boundary. Outcomes collected
    /// before the abort are preserved by the caller.
    #[error("unexpected error during conversion run: {0}")]
    Internal(#[source] anyhow::Error),
}

impl RunError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, RunError::CapabilityUnavailable)
    }
}

/// Per-file conversion failure. Isolated: recorded against the file and never
/// propagated out of the run loop.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file does not appear to be a HEIC/HEIF file")]
    NotHeic,

    #[error("file appears to be empty or corrupted")]
    EmptyInput,

    #[error("conversion timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("unexpected conversion result format")]
    MalformedResult,

    #[error("converted file is empty")]
    EmptyOutput,

    #[error("decode failed: {0}")]
    Decode(#[source] anyhow::Error),
}

impl FileError {
    /// Actionable message for the user, with decode errors run through the
    /// text classifier.
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotHeic => "File does not appear to be a HEIC/HEIF file".to_string(),
            FileError::EmptyInput => "File appears to be empty or corrupted".to_string(),
            FileError::Timeout { secs } => format!(
                "Cannot convert: conversion timed out after {} seconds. \
                 The file may be too large or corrupted.",
                secs
            ),
            FileError::MalformedResult => "Unexpected conversion result format".to_string(),
            FileError::EmptyOutput => {
                "Cannot convert: converted file is empty. The original file may be corrupted."
                    .to_string()
            }
            FileError::Decode(err) => {
                let text = err.to_string();
                FailureKind::classify(&text).user_message(&text)
            }
        }
    }
}

/// Best-effort category for a decode error, derived from its message text.
///
/// Purely for user messaging; never used for control flow. Unmatched messages
/// fall through to `Other` and are shown verbatim behind a generic framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    BrowserCompat,
    UnsupportedFormat,
    CorruptedInput,
    Other,
}

impl FailureKind {
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("worker") || lower.contains("web worker") {
            FailureKind::BrowserCompat
        } else if lower.contains("format") || lower.contains("unsupported") {
            FailureKind::UnsupportedFormat
        } else if lower.contains("corrupt") || lower.contains("invalid") {
            FailureKind::CorruptedInput
        } else {
            FailureKind::Other
        }
    }

    pub fn user_message(self, original: &str) -> String {
        match self {
            FailureKind::BrowserCompat => {
                "Cannot convert: browser compatibility issue. \
                 Please try using Chrome or Safari."
                    .to_string()
            }
            FailureKind::UnsupportedFormat => {
                "Cannot convert: file format not supported. \
                 Please ensure the file is a valid HEIC image."
                    .to_string()
            }
            FailureKind::CorruptedInput => {
                "Cannot convert: file appears to be corrupted or invalid.".to_string()
            }
            FailureKind::Other => format!("Cannot convert: {}", original),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_reason_mapping() {
        assert_eq!(
            AdmissionError::WrongFormat.reason(),
            RejectReason::WrongFormat
        );
        assert_eq!(
            AdmissionError::TooLarge { size: 10, max: 5 }.reason(),
            RejectReason::TooLarge
        );
        assert_eq!(AdmissionError::Duplicate.reason(), RejectReason::Duplicate);
        assert_eq!(
            AdmissionError::TooManyFiles {
                existing: 19,
                incoming: 2,
                max: 20
            }
            .reason(),
            RejectReason::TooManyFiles
        );
    }

    #[test]
    fn test_run_error_retryable() {
        assert!(RunError::CapabilityUnavailable.is_retryable());
        assert!(!RunError::Internal(anyhow::anyhow!("boom")).is_retryable());
    }

    #[test]
    fn test_classify_browser_compat() {
        assert_eq!(
            FailureKind::classify("Web Worker failed to start"),
            FailureKind::BrowserCompat
        );
    }

    #[test]
    fn test_classify_unsupported_format() {
        assert_eq!(
            FailureKind::classify("unsupported codec"),
            FailureKind::UnsupportedFormat
        );
        assert_eq!(
            FailureKind::classify("unknown image Format"),
            FailureKind::UnsupportedFormat
        );
    }

    #[test]
    fn test_classify_corrupted() {
        assert_eq!(
            FailureKind::classify("invalid box header"),
            FailureKind::CorruptedInput
        );
        assert_eq!(
            FailureKind::classify("data is corrupt"),
            FailureKind::CorruptedInput
        );
    }

    #[test]
    fn test_classify_fallback_keeps_message() {
        let kind = FailureKind::classify("out of cheese");
        assert_eq!(kind, FailureKind::Other);
        assert_eq!(
            kind.user_message("out of cheese"),
            "Cannot convert: out of cheese"
        );
    }

    #[test]
    fn test_decode_error_user_message_goes_through_classifier() {
        let err = FileError::Decode(anyhow::anyhow!("input is corrupt"));
        assert!(err.user_message().contains("corrupted or invalid"));
    }

    #[test]
    fn test_reject_reason_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RejectReason::TooManyFiles).unwrap(),
            "\"too-many-files\""
        );
        assert_eq!(
            serde_json::to_string(&RejectReason::WrongFormat).unwrap(),
            "\"wrong-format\""
        );
    }
}
