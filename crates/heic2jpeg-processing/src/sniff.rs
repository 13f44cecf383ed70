//! HEIC/HEIF format detection.
//!
//! Mobile hosts often report an empty or generic media type for HEIC files, so
//! detection there is deliberately permissive: a plausible file is accepted
//! `Tentative` and the decode step is left to fail gracefully if it turns out
//! to be something else. The orchestrator re-sniffs before converting.

use heic2jpeg_core::config::Platform;
use heic2jpeg_core::models::{CandidateFile, SniffVerdict};

const HEIC_CONTENT_TYPES: [&str; 4] = [
    "image/heic",
    "image/heif",
    "image/heic-sequence",
    "image/heif-sequence",
];

/// Empty-typed files below this size are not worth a tentative accept; real
/// HEIC photos are almost always larger.
const TENTATIVE_MIN_SIZE_BYTES: u64 = 100_000;

/// Classify a candidate as certainly HEIC/HEIF, tentatively acceptable, or
/// rejected.
pub fn sniff(file: &CandidateFile, platform: Platform) -> SniffVerdict {
    let name = file.name.to_lowercase();

    // Extension is the most reliable signal.
    if name.ends_with(".heic") || name.ends_with(".heif") {
        return SniffVerdict::Certain;
    }

    let content_type = file.content_type.to_lowercase();
    if HEIC_CONTENT_TYPES.contains(&content_type.as_str()) {
        return SniffVerdict::Certain;
    }

    if platform == Platform::Mobile {
        if content_type.is_empty() && file.size > TENTATIVE_MIN_SIZE_BYTES {
            return SniffVerdict::Tentative;
        }
        if name.contains("heic") || name.contains("heif") {
            return SniffVerdict::Tentative;
        }
    }

    SniffVerdict::Reject
}
