//! Admission filter: validates candidates before they enter the working batch.
//!
//! Rule order per candidate: format, size, duplicate. The batch-count guard
//! runs first and is atomic — if the incoming set would overflow the limit,
//! none of it is admitted.

use heic2jpeg_core::config::ConverterConfig;
use heic2jpeg_core::error::{AdmissionError, RejectReason};
use heic2jpeg_core::models::{AdmittedBatch, CandidateFile};

use crate::sniff::sniff;

/// Rejected file names grouped under one reason.
#[derive(Debug, Clone)]
pub struct RejectedGroup {
    pub reason: RejectReason,
    pub names: Vec<String>,
}

/// Outcome of one `admit` call: how many files entered the batch, and which
/// were turned away, grouped by reason in reporting order
/// (format → too-large → duplicate, or a single too-many-files group).
#[derive(Debug, Clone, Default)]
pub struct AdmissionReport {
    pub accepted: usize,
    pub rejections: Vec<RejectedGroup>,
}

impl AdmissionReport {
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

pub struct AdmissionFilter {
    config: ConverterConfig,
}

impl AdmissionFilter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Validate `candidates` against the batch, appending accepted files in
    /// input order.
    pub fn admit(
        &self,
        candidates: Vec<CandidateFile>,
        batch: &mut AdmittedBatch,
    ) -> AdmissionReport {
        if batch.len() + candidates.len() > self.config.max_batch_count {
            let err = AdmissionError::TooManyFiles {
                existing: batch.len(),
                incoming: candidates.len(),
                max: self.config.max_batch_count,
            };
            tracing::warn!(error = %err, "rejecting incoming files");
            return AdmissionReport {
                accepted: 0,
                rejections: vec![RejectedGroup {
                    reason: err.reason(),
                    names: candidates.into_iter().map(|f| f.name).collect(),
                }],
            };
        }

        let mut accepted = 0;
        let mut wrong_format = Vec::new();
        let mut too_large = Vec::new();
        let mut duplicates = Vec::new();

        for file in candidates {
            let rejection = if !sniff(&file, self.config.platform).is_accepted() {
                Some(AdmissionError::WrongFormat)
            } else if file.size > self.config.max_file_size_bytes {
                Some(AdmissionError::TooLarge {
                    size: file.size,
                    max: self.config.max_file_size_bytes,
                })
            } else if batch.contains(&file.name, file.size) {
                // Also catches duplicates within the incoming set, since
                // accepted files are appended as we go.
                Some(AdmissionError::Duplicate)
            } else {
                None
            };

            match rejection {
                Some(err) => {
                    tracing::debug!(
                        file = %file.name,
                        content_type = %file.content_type,
                        size = file.size,
                        error = %err,
                        "rejected at admission"
                    );
                    match err.reason() {
                        RejectReason::WrongFormat => wrong_format.push(file.name),
                        RejectReason::TooLarge => too_large.push(file.name),
                        RejectReason::Duplicate => duplicates.push(file.name),
                        RejectReason::TooManyFiles => unreachable!("handled by the count guard"),
                    }
                }
                None => {
                    batch.push(file);
                    accepted += 1;
                }
            }
        }

        let mut rejections = Vec::new();
        for (reason, names) in [
            (RejectReason::WrongFormat, wrong_format),
            (RejectReason::TooLarge, too_large),
            (RejectReason::Duplicate, duplicates),
        ] {
            if !names.is_empty() {
                rejections.push(RejectedGroup { reason, names });
            }
        }

        AdmissionReport {
            accepted,
            rejections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use heic2jpeg_core::config::Platform;

    fn file(name: &str, content_type: &str, size: u64) -> CandidateFile {
        CandidateFile {
            name: name.to_string(),
            size,
            content_type: content_type.to_string(),
            data: Bytes::new(),
        }
    }

    fn heic(name: &str, size: u64) -> CandidateFile {
        file(name, "image/heic", size)
    }

    fn filter() -> AdmissionFilter {
        AdmissionFilter::new(ConverterConfig::default())
    }

    #[test]
    fn test_accepts_in_input_order() {
        let mut batch = AdmittedBatch::new();
        let report = filter().admit(vec![heic("a.heic", 1), heic("b.heic", 2)], &mut batch);
        assert_eq!(report.accepted, 2);
        assert!(report.is_clean());
        let names: Vec<_> = batch.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.heic", "b.heic"]);
    }

    #[test]
    fn test_count_guard_rejects_entire_incoming_batch() {
        let mut batch = AdmittedBatch::new();
        for i in 0..19 {
            batch.push(heic(&format!("{}.heic", i), i as u64));
        }
        let report = filter().admit(vec![heic("x.heic", 100), heic("y.heic", 101)], &mut batch);
        assert_eq!(report.accepted, 0);
        assert_eq!(batch.len(), 19);
        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].reason, RejectReason::TooManyFiles);
        assert_eq!(report.rejections[0].names, ["x.heic", "y.heic"]);
    }

    #[test]
    fn test_wrong_format_rejected_batch_unchanged() {
        let mut batch = AdmittedBatch::new();
        let report = filter().admit(vec![file("doc.pdf", "application/pdf", 1000)], &mut batch);
        assert_eq!(report.accepted, 0);
        assert!(batch.is_empty());
        assert_eq!(report.rejections[0].reason, RejectReason::WrongFormat);
        assert_eq!(report.rejections[0].names, ["doc.pdf"]);
    }

    #[test]
    fn test_oversized_file_rejected() {
        let mut batch = AdmittedBatch::new();
        let report = filter().admit(vec![heic("big.heic", 60 * 1024 * 1024)], &mut batch);
        assert_eq!(report.accepted, 0);
        assert_eq!(report.rejections[0].reason, RejectReason::TooLarge);
    }

    #[test]
    fn test_duplicate_yields_single_entry() {
        let mut batch = AdmittedBatch::new();
        filter().admit(vec![heic("a.heic", 100)], &mut batch);
        let report = filter().admit(vec![heic("a.heic", 100)], &mut batch);
        assert_eq!(report.accepted, 0);
        assert_eq!(batch.len(), 1);
        assert_eq!(report.rejections[0].reason, RejectReason::Duplicate);
    }

    #[test]
    fn test_duplicate_within_incoming_set() {
        let mut batch = AdmittedBatch::new();
        let report = filter().admit(vec![heic("a.heic", 100), heic("a.heic", 100)], &mut batch);
        assert_eq!(report.accepted, 1);
        assert_eq!(batch.len(), 1);
        assert_eq!(report.rejections[0].reason, RejectReason::Duplicate);
    }

    #[test]
    fn test_same_name_different_size_not_duplicate() {
        let mut batch = AdmittedBatch::new();
        let report = filter().admit(vec![heic("a.heic", 100), heic("a.heic", 200)], &mut batch);
        assert_eq!(report.accepted, 2);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_rejection_groups_ordered() {
        let mut batch = AdmittedBatch::new();
        batch.push(heic("dup.heic", 5));
        let report = filter().admit(
            vec![
                heic("dup.heic", 5),
                heic("big.heic", 60 * 1024 * 1024),
                file("doc.pdf", "application/pdf", 10),
            ],
            &mut batch,
        );
        let reasons: Vec<_> = report.rejections.iter().map(|g| g.reason).collect();
        assert_eq!(
            reasons,
            [
                RejectReason::WrongFormat,
                RejectReason::TooLarge,
                RejectReason::Duplicate
            ]
        );
    }

    #[test]
    fn test_mobile_tentative_files_admitted() {
        let config = ConverterConfig::for_platform(Platform::Mobile);
        let filter = AdmissionFilter::new(config);
        let mut batch = AdmittedBatch::new();
        let report = filter.admit(vec![file("IMG_0001", "", 2_000_000)], &mut batch);
        assert_eq!(report.accepted, 1);
    }
}
