//! Batch HEIC → JPEG conversion: admission filtering, the sequential
//! conversion orchestrator, the result store, and the reporting surface.
//!
//! Pixel decoding is delegated to an external [`codec::JpegConverter`]
//! implementation; this crate owns everything around it — which files get in,
//! how a run over them proceeds, how failures are isolated, and what the host
//! gets to show the user.

pub mod admission;
pub mod codec;
pub mod orchestrator;
pub mod report;
pub mod session;
pub mod sniff;
pub mod store;

pub use admission::{AdmissionFilter, AdmissionReport, RejectedGroup};
pub use codec::{DecodeOutput, JpegConverter, ReadyGate};
pub use orchestrator::Orchestrator;
pub use report::{ConversionReporter, NullReporter, TracingReporter};
pub use session::ConverterSession;
pub use store::ResultStore;
