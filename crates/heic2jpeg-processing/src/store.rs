//! Result store: converted artifacts and their revocable payload handles.

use std::collections::HashMap;

use bytes::Bytes;
use heic2jpeg_core::models::{ArtifactHandle, ConvertedArtifact};

/// Holds the Success outcomes of the most recent run. Each artifact's payload
/// is reachable through its handle until revoked; `clear` revokes everything.
#[derive(Debug, Default)]
pub struct ResultStore {
    artifacts: Vec<ConvertedArtifact>,
    payloads: HashMap<ArtifactHandle, Bytes>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converted payload and return its artifact record.
    pub fn register(&mut self, name: String, data: Bytes) -> ConvertedArtifact {
        let handle = ArtifactHandle::new();
        let artifact = ConvertedArtifact {
            name,
            size: data.len() as u64,
            handle,
        };
        self.payloads.insert(handle, data);
        self.artifacts.push(artifact.clone());
        artifact
    }

    /// Fetch a payload by handle. `None` once revoked.
    pub fn retrieve(&self, handle: ArtifactHandle) -> Option<Bytes> {
        self.payloads.get(&handle).cloned()
    }

    /// Release one handle. No-op if already revoked or never registered.
    pub fn revoke(&mut self, handle: ArtifactHandle) {
        self.payloads.remove(&handle);
        self.artifacts.retain(|a| a.handle != handle);
    }

    /// Release every held handle and discard all entries. Idempotent.
    pub fn clear(&mut self) {
        if !self.artifacts.is_empty() {
            tracing::debug!(revoked = self.artifacts.len(), "clearing result store");
        }
        self.payloads.clear();
        self.artifacts.clear();
    }

    pub fn artifacts(&self) -> &[ConvertedArtifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Combined size of all held payloads.
    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size).sum()
    }
}
