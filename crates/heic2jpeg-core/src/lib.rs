//! Core domain types for the HEIC → JPEG batch converter.
//!
//! This crate provides the domain models, error taxonomy, and configuration
//! shared by the processing crate and by hosts embedding the converter.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ConverterConfig, Platform};
pub use error::{AdmissionError, FailureKind, FileError, RejectReason, RunError};
pub use models::{
    AdmittedBatch, ArtifactHandle, CandidateFile, ConversionOutcome, ConversionRun,
    ConvertedArtifact, RunReport, RunVerdict, SniffVerdict,
};
