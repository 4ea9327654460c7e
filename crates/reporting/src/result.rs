//! Run result envelope.
//!
//! The core report is deliberately free of timestamps so it can be rebuilt
//! identically from a sample log. Everything that identifies a particular run
//! lives here instead.

use chrono::{DateTime, Utc};
use pathbench_core::{BackendKind, BenchmarkReport, RunOptions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifying metadata for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Unique identifier of the run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished, once it has.
    pub finished_at: Option<DateTime<Utc>>,
    /// Parameters the run used.
    pub options: RunOptions,
    /// Display name of the primary backend.
    pub primary_backend: String,
    /// Display name of the alternate backend.
    pub alternate_backend: String,
    /// Harness version.
    pub version: String,
}

impl RunMetadata {
    /// Start metadata for a run beginning now.
    pub fn start(
        options: RunOptions,
        primary_backend: impl Into<String>,
        alternate_backend: impl Into<String>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            options,
            primary_backend: primary_backend.into(),
            alternate_backend: alternate_backend.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Mark the run finished now.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall time of the run in seconds, if finished.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Display name of one backend.
    pub fn backend_name(&self, kind: BackendKind) -> &str {
        match kind {
            BackendKind::Primary => &self.primary_backend,
            BackendKind::Alternate => &self.alternate_backend,
        }
    }
}

/// A finished run: metadata plus the comparative report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Run identification.
    pub metadata: RunMetadata,
    /// Statistics and samples.
    pub report: BenchmarkReport,
}

impl BenchmarkResult {
    /// Wrap a report, marking the metadata finished if it is not already.
    pub fn new(mut metadata: RunMetadata, report: BenchmarkReport) -> Self {
        if metadata.finished_at.is_none() {
            metadata.finish();
        }
        Self { metadata, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathbench_core::build_report;

    #[test]
    fn test_new_result_is_finished() {
        let metadata = RunMetadata::start(RunOptions::default(), "postgres-direct", "http-sql");
        assert!(metadata.finished_at.is_none());
        assert!(metadata.elapsed_secs().is_none());

        let result = BenchmarkResult::new(metadata, build_report(&[]));
        let finished = result.metadata.finished_at.unwrap();
        assert!(finished >= result.metadata.started_at);
        assert!(result.metadata.elapsed_secs().unwrap() >= 0.0);
    }

    #[test]
    fn test_backend_names() {
        let metadata = RunMetadata::start(RunOptions::default(), "postgres-direct", "http-sql");
        assert_eq!(metadata.backend_name(BackendKind::Primary), "postgres-direct");
        assert_eq!(metadata.backend_name(BackendKind::Alternate), "http-sql");
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunMetadata::start(RunOptions::default(), "a", "b");
        let b = RunMetadata::start(RunOptions::default(), "a", "b");
        assert_ne!(a.run_id, b.run_id);
    }
}
