//! External decode capability seam.
//!
//! The converter itself is an opaque, fallible, async black box supplied by
//! the host. `ReadyGate` carries its availability: a resolved-once signal the
//! orchestrator checks before starting a run, replacing readiness polling.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::watch;

/// Raw output of a decode call. Some converters return one payload, some a
/// sequence (e.g. one per image in a HEIC burst); normalization takes the
/// first.
#[derive(Debug, Clone)]
pub enum DecodeOutput {
    Single(Bytes),
    Multiple(Vec<Bytes>),
}

impl DecodeOutput {
    /// First payload, or `None` for an empty sequence.
    pub fn into_first(self) -> Option<Bytes> {
        match self {
            DecodeOutput::Single(data) => Some(data),
            DecodeOutput::Multiple(parts) => parts.into_iter().next(),
        }
    }
}

/// External HEIC → JPEG decode capability.
#[async_trait]
pub trait JpegConverter: Send + Sync {
    /// Convert `data` to JPEG at `quality` (0.0–1.0 scale).
    async fn convert_to_jpeg(&self, data: &[u8], quality: f64) -> anyhow::Result<DecodeOutput>;
}

/// Resolved-once readiness signal for the decode capability.
///
/// The host calls [`mark_ready`](ReadyGate::mark_ready) once its converter is
/// loaded; consumers either probe [`is_ready`](ReadyGate::is_ready) (the
/// orchestrator's retryable-error path) or await [`ready`](ReadyGate::ready).
#[derive(Clone)]
pub struct ReadyGate {
    tx: Arc<watch::Sender<bool>>,
}

impl ReadyGate {
    /// A gate that starts not-ready.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A gate that is ready from the start, for converters available at
    /// construction time.
    pub fn ready_now() -> Self {
        let gate = Self::new();
        gate.mark_ready();
        gate
    }

    /// Resolve the signal. Idempotent.
    pub fn mark_ready(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the gate is marked ready.
    pub async fn ready(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}
