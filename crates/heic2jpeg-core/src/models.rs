//! Domain models for candidate files, the admitted batch, and run state.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user-supplied input file. Immutable once admitted to the batch.
///
/// The declared `content_type` comes from the host and may be empty or wrong;
/// format detection never trusts it alone.
#[derive(Clone, Debug)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// Ordered working set of admitted files.
///
/// The admission filter is the only writer that enforces the batch invariants
/// (count limit, per-file size limit, unique (name, size) pairs); direct
/// `push` calls bypass those checks.
#[derive(Clone, Debug, Default)]
pub struct AdmittedBatch {
    files: Vec<CandidateFile>,
}

impl AdmittedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True if an entry with the same (name, size) pair is already present.
    pub fn contains(&self, name: &str, size: u64) -> bool {
        self.files.iter().any(|f| f.name == name && f.size == size)
    }

    pub fn push(&mut self, file: CandidateFile) {
        self.files.push(file);
    }

    pub fn remove(&mut self, index: usize) -> Option<CandidateFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateFile> {
        self.files.iter()
    }

    pub fn files(&self) -> &[CandidateFile] {
        &self.files
    }
}

/// Tagged format-detection decision.
///
/// `Tentative` marks files accepted by the permissive mobile heuristic; the
/// decode step is expected to fail gracefully if they turn out not to be HEIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SniffVerdict {
    Certain,
    Tentative,
    Reject,
}

impl SniffVerdict {
    pub fn is_accepted(self) -> bool {
        !matches!(self, SniffVerdict::Reject)
    }
}

/// Revocable handle to a converted payload held by the result store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactHandle(Uuid);

impl ArtifactHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Record of one successfully converted file. The payload itself lives in the
/// result store, reachable through `handle` until revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedArtifact {
    pub name: String,
    pub size: u64,
    pub handle: ArtifactHandle,
}

/// Per-file result of a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConversionOutcome {
    Success(ConvertedArtifact),
    Failure { file_name: String, message: String },
}

/// Ephemeral state of one "convert all admitted files" invocation.
#[derive(Debug, Clone)]
pub struct ConversionRun {
    pub total: usize,
    pub completed: usize,
    pub started_at: DateTime<Utc>,
    pub failures: Vec<String>,
}

impl ConversionRun {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            started_at: Utc::now(),
            failures: Vec::new(),
        }
    }

    /// Advance the completed counter; failures advance it too.
    pub fn advance(&mut self) {
        self.completed += 1;
    }

    /// Reportable percentage, `round(100 * completed / total)`.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((100.0 * self.completed as f64 / self.total as f64).round()) as u8
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// Aggregate verdict of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunVerdict {
    Full,
    Partial,
    TotalFailure,
}

/// Final report of a conversion run, handed to the reporting surface.
/// `outcomes` keeps batch order, so reporting stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub success_count: usize,
    pub total_count: usize,
    pub failures: Vec<String>,
    pub outcomes: Vec<ConversionOutcome>,
    pub verdict: RunVerdict,
}

impl RunReport {
    pub fn from_outcomes(total_count: usize, outcomes: Vec<ConversionOutcome>) -> Self {
        let success_count = outcomes
            .iter()
            .filter(|o| matches!(o, ConversionOutcome::Success(_)))
            .count();
        let failures: Vec<String> = outcomes
            .iter()
            .filter_map(|o| match o {
                ConversionOutcome::Success(_) => None,
                ConversionOutcome::Failure { message, .. } => Some(message.clone()),
            })
            .collect();
        let verdict = if failures.is_empty() {
            RunVerdict::Full
        } else if success_count > 0 {
            RunVerdict::Partial
        } else {
            RunVerdict::TotalFailure
        };
        Self {
            success_count,
            total_count,
            failures,
            outcomes,
            verdict,
        }
    }

    /// Report for a run over an empty batch: nothing attempted, nothing failed.
    pub fn empty() -> Self {
        Self::from_outcomes(0, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, size: u64) -> CandidateFile {
        CandidateFile {
            name: name.to_string(),
            size,
            content_type: "image/heic".to_string(),
            data: Bytes::new(),
        }
    }

    #[test]
    fn test_candidate_size_from_data() {
        let file = CandidateFile::new("a.heic", "image/heic", Bytes::from(vec![0u8; 1234]));
        assert_eq!(file.size, 1234);
    }

    #[test]
    fn test_batch_contains_name_and_size() {
        let mut batch = AdmittedBatch::new();
        batch.push(candidate("a.heic", 100));
        assert!(batch.contains("a.heic", 100));
        assert!(!batch.contains("a.heic", 101));
        assert!(!batch.contains("b.heic", 100));
    }

    #[test]
    fn test_batch_remove_out_of_range() {
        let mut batch = AdmittedBatch::new();
        batch.push(candidate("a.heic", 100));
        assert!(batch.remove(5).is_none());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.remove(0).map(|f| f.name), Some("a.heic".to_string()));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_run_percent_rounds() {
        let mut run = ConversionRun::new(3);
        assert_eq!(run.percent(), 0);
        run.advance();
        assert_eq!(run.percent(), 33);
        run.advance();
        assert_eq!(run.percent(), 67);
        run.advance();
        assert_eq!(run.percent(), 100);
        assert!(run.is_finished());
    }

    #[test]
    fn test_run_percent_empty_total() {
        let run = ConversionRun::new(0);
        assert_eq!(run.percent(), 100);
    }

    fn success(name: &str) -> ConversionOutcome {
        ConversionOutcome::Success(ConvertedArtifact {
            name: name.to_string(),
            size: 1,
            handle: ArtifactHandle::new(),
        })
    }

    fn failure(name: &str) -> ConversionOutcome {
        ConversionOutcome::Failure {
            file_name: name.to_string(),
            message: format!("{}: failed", name),
        }
    }

    #[test]
    fn test_report_verdicts() {
        let full = RunReport::from_outcomes(2, vec![success("a.jpg"), success("b.jpg")]);
        assert_eq!(full.verdict, RunVerdict::Full);
        assert_eq!(full.success_count, 2);
        assert!(full.failures.is_empty());

        let partial = RunReport::from_outcomes(2, vec![success("a.jpg"), failure("b.heic")]);
        assert_eq!(partial.verdict, RunVerdict::Partial);
        assert_eq!(partial.success_count, 1);
        assert_eq!(partial.failures, vec!["b.heic: failed".to_string()]);

        let total = RunReport::from_outcomes(1, vec![failure("a.heic")]);
        assert_eq!(total.verdict, RunVerdict::TotalFailure);

        assert_eq!(RunReport::empty().verdict, RunVerdict::Full);
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport::from_outcomes(2, vec![success("a.jpg"), failure("b.heic")]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"verdict\":\"partial\""));
        assert!(json.contains("\"success_count\":1"));
        assert!(json.contains("\"kind\":\"success\""));
    }
}
