//! Session facade: one object owning the batch, result store, and
//! orchestrator for a single user session. Hosts hold one of these instead of
//! ambient globals.

use std::sync::Arc;

use bytes::Bytes;
use heic2jpeg_core::config::ConverterConfig;
use heic2jpeg_core::error::RunError;
use heic2jpeg_core::models::{
    AdmittedBatch, ArtifactHandle, CandidateFile, ConvertedArtifact, RunReport,
};

use crate::admission::{AdmissionFilter, AdmissionReport};
use crate::codec::{JpegConverter, ReadyGate};
use crate::orchestrator::Orchestrator;
use crate::report::ConversionReporter;
use crate::store::ResultStore;

pub struct ConverterSession {
    batch: AdmittedBatch,
    store: ResultStore,
    admission: AdmissionFilter,
    orchestrator: Orchestrator,
    reporter: Arc<dyn ConversionReporter>,
}

impl ConverterSession {
    pub fn new(
        config: ConverterConfig,
        converter: Arc<dyn JpegConverter>,
        gate: ReadyGate,
        reporter: Arc<dyn ConversionReporter>,
    ) -> Self {
        Self {
            batch: AdmittedBatch::new(),
            store: ResultStore::new(),
            admission: AdmissionFilter::new(config.clone()),
            orchestrator: Orchestrator::new(config, converter, gate),
            reporter,
        }
    }

    /// Run candidates through admission, appending accepted files to the
    /// batch and surfacing every rejection group to the reporter.
    pub fn add_files(&mut self, candidates: Vec<CandidateFile>) -> AdmissionReport {
        let report = self.admission.admit(candidates, &mut self.batch);
        for group in &report.rejections {
            self.reporter.on_admission_rejected(group.reason, &group.names);
        }
        report
    }

    /// Remove one selected file. `None` if the index is out of range.
    pub fn remove_file(&mut self, index: usize) -> Option<CandidateFile> {
        self.batch.remove(index)
    }

    /// Drop the selection and revoke every converted artifact.
    pub fn clear_all(&mut self) {
        self.batch.clear();
        self.store.clear();
    }

    /// Convert every admitted file. See [`Orchestrator::run`] for semantics.
    pub async fn convert_all(&mut self) -> Result<RunReport, RunError> {
        self.orchestrator
            .run(&self.batch, &mut self.store, self.reporter.as_ref())
            .await
    }

    pub fn selected_files(&self) -> &[CandidateFile] {
        self.batch.files()
    }

    pub fn artifacts(&self) -> &[ConvertedArtifact] {
        self.store.artifacts()
    }

    /// Converted payload for download. `None` once revoked.
    pub fn artifact_data(&self, handle: ArtifactHandle) -> Option<Bytes> {
        self.store.retrieve(handle)
    }
}
