//! Sequential conversion orchestrator.
//!
//! Drives one conversion run over the admitted batch: strictly one file at a
//! time, in batch order, each file raced against the configured timeout, with
//! every failure caught at the file boundary so the rest of the batch still
//! gets its turn. A timed-out decode is abandoned, not aborted; its underlying
//! work may keep running until the converter gives up on its own.

use std::sync::Arc;

use bytes::Bytes;
use heic2jpeg_core::config::ConverterConfig;
use heic2jpeg_core::error::{FileError, RunError};
use heic2jpeg_core::models::{
    AdmittedBatch, CandidateFile, ConversionOutcome, ConversionRun, RunReport, RunVerdict,
};

use crate::codec::{JpegConverter, ReadyGate};
use crate::report::{converting_message, ConversionReporter};
use crate::sniff::sniff;
use crate::store::ResultStore;

pub struct Orchestrator {
    config: ConverterConfig,
    converter: Arc<dyn JpegConverter>,
    gate: ReadyGate,
}

impl Orchestrator {
    pub fn new(config: ConverterConfig, converter: Arc<dyn JpegConverter>, gate: ReadyGate) -> Self {
        Self {
            config,
            converter,
            gate,
        }
    }

    pub fn gate(&self) -> &ReadyGate {
        &self.gate
    }

    /// Convert every file in the batch, storing successes in `store` and
    /// reporting progress after each outcome.
    ///
    /// An empty batch returns an empty report without touching the converter.
    /// A not-yet-ready converter fails with the retryable
    /// [`RunError::CapabilityUnavailable`] before anything is cleared or
    /// started. The store is reset at the start of each run, so artifacts from
    /// the previous run are revoked and replaced.
    #[tracing::instrument(skip_all, fields(total = batch.len()))]
    pub async fn run(
        &self,
        batch: &AdmittedBatch,
        store: &mut ResultStore,
        reporter: &dyn ConversionReporter,
    ) -> Result<RunReport, RunError> {
        if batch.is_empty() {
            tracing::debug!("no admitted files, skipping run");
            return Ok(RunReport::empty());
        }
        if !self.gate.is_ready() {
            tracing::warn!("decode capability not ready, refusing to start run");
            return Err(RunError::CapabilityUnavailable);
        }

        store.clear();

        let mut run = ConversionRun::new(batch.len());
        let mut outcomes: Vec<ConversionOutcome> = Vec::with_capacity(batch.len());

        for (index, file) in batch.iter().enumerate() {
            reporter.on_progress(run.percent(), &converting_message(index, run.total, file));

            match self.convert_one(file).await {
                Ok((name, data)) => {
                    let artifact = store.register(name, data);
                    tracing::info!(
                        file = %file.name,
                        output = %artifact.name,
                        output_bytes = artifact.size,
                        "converted"
                    );
                    outcomes.push(ConversionOutcome::Success(artifact));
                }
                Err(err) => {
                    tracing::warn!(file = %file.name, error = %err, "conversion failed");
                    let message = format!("{}: {}", file.name, err.user_message());
                    run.failures.push(message.clone());
                    outcomes.push(ConversionOutcome::Failure {
                        file_name: file.name.clone(),
                        message,
                    });
                }
            }

            run.advance();
            reporter.on_progress(
                run.percent(),
                &format!("Completed {} of {}", run.completed, run.total),
            );
        }

        let report = RunReport::from_outcomes(run.total, outcomes);
        match report.verdict {
            RunVerdict::Full => {
                tracing::info!(converted = report.success_count, "conversion run finished")
            }
            RunVerdict::Partial => tracing::warn!(
                converted = report.success_count,
                total = run.total,
                "conversion run finished with partial success"
            ),
            RunVerdict::TotalFailure => tracing::error!(
                total = run.total,
                "conversion run finished with no successful files"
            ),
        }
        reporter.on_run_complete(report.success_count, report.total_count, &report.failures);

        Ok(report)
    }

    /// Convert a single file. Every error path here stays inside the per-file
    /// isolation boundary.
    async fn convert_one(&self, file: &CandidateFile) -> Result<(String, Bytes), FileError> {
        // Re-validate: tentatively admitted files may not be HEIC after all.
        if !sniff(file, self.config.platform).is_accepted() {
            return Err(FileError::NotHeic);
        }
        if file.data.is_empty() {
            return Err(FileError::EmptyInput);
        }

        let decode = self
            .converter
            .convert_to_jpeg(&file.data, self.config.jpeg_quality);
        let output = match tokio::time::timeout(self.config.timeout, decode).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(FileError::Decode(err)),
            Err(_) => {
                return Err(FileError::Timeout {
                    secs: self.config.timeout.as_secs(),
                })
            }
        };

        let data = output.into_first().ok_or(FileError::MalformedResult)?;
        if data.is_empty() {
            return Err(FileError::EmptyOutput);
        }

        Ok((jpg_name(&file.name), data))
    }
}

/// Derive the output name: a trailing `.heic`/`.heif` (any case) becomes
/// `.jpg`; names without that suffix get `.jpg` appended.
pub(crate) fn jpg_name(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.ends_with(".heic") || lower.ends_with(".heif") {
        format!("{}.jpg", &name[..name.len() - 5])
    } else {
        format!("{}.jpg", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpg_name_swaps_extension() {
        assert_eq!(jpg_name("photo.heic"), "photo.jpg");
        assert_eq!(jpg_name("photo.HEIC"), "photo.jpg");
        assert_eq!(jpg_name("trip.heif"), "trip.jpg");
        assert_eq!(jpg_name("trip.HeIf"), "trip.jpg");
    }

    #[test]
    fn test_jpg_name_appends_when_no_heic_suffix() {
        assert_eq!(jpg_name("IMG_0001"), "IMG_0001.jpg");
        assert_eq!(jpg_name("archive.heic.bak"), "archive.heic.bak.jpg");
    }

    #[test]
    fn test_jpg_name_preserves_stem_case() {
        assert_eq!(jpg_name("Vacation.HEIC"), "Vacation.jpg");
    }
}
