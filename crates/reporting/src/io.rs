//! Writing run results to the filesystem.
//!
//! A run directory holds up to three files:
//! - `report.json` - metadata plus per-backend and per-category statistics
//! - `samples.json` - every recorded sample
//! - `summary.md` - Markdown summary

use crate::markdown;
use crate::result::{BenchmarkResult, RunMetadata};
use pathbench_core::{BenchmarkReport, CategoryBreakdown, SpeedupRatios, StatsSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default output directory.
pub const OUTPUT_DIR: &str = "pathbench-output";

/// Statistics file name.
pub const REPORT_FILE: &str = "report.json";

/// Raw samples file name.
pub const SAMPLES_FILE: &str = "samples.json";

/// Markdown summary file name.
pub const SUMMARY_FILE: &str = "summary.md";

/// Errors raised while writing outputs.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, ReportingError>;

/// Which files to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `report.json` and `samples.json`
    Json,
    /// `summary.md`
    Markdown,
    /// Everything
    #[default]
    Both,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::Both)
    }
}

/// On-disk shape of `report.json`. Samples are kept in their own file.
#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    metadata: &'a RunMetadata,
    primary: &'a StatsSummary,
    alternate: &'a StatsSummary,
    speedup: &'a SpeedupRatios,
    categories: &'a BTreeMap<String, CategoryBreakdown>,
    total_samples: usize,
}

impl<'a> ReportFile<'a> {
    fn new(metadata: &'a RunMetadata, report: &'a BenchmarkReport) -> Self {
        Self {
            metadata,
            primary: &report.primary,
            alternate: &report.alternate,
            speedup: &report.speedup,
            categories: &report.categories,
            total_samples: report.samples.len(),
        }
    }
}

/// Ensure the output directory exists.
pub fn ensure_output_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ReportingError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: PathBuf, contents: String) -> Result<PathBuf> {
    fs::write(&path, contents).map_err(|source| ReportingError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write `report.json`.
pub fn write_report_json(result: &BenchmarkResult, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&ReportFile::new(&result.metadata, &result.report))?;
    write_file(dir.as_ref().join(REPORT_FILE), json)
}

/// Write `samples.json`.
pub fn write_samples_json(result: &BenchmarkResult, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&result.report.samples)?;
    write_file(dir.as_ref().join(SAMPLES_FILE), json)
}

/// Write `summary.md`.
pub fn write_summary(result: &BenchmarkResult, dir: impl AsRef<Path>) -> Result<PathBuf> {
    write_file(
        dir.as_ref().join(SUMMARY_FILE),
        markdown::generate_summary(result),
    )
}

/// Write every output `format` asks for into `dir`, returning the paths written.
pub fn write_all_outputs(
    result: &BenchmarkResult,
    dir: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure_output_dir(dir)?;

    let mut written = Vec::new();
    if format.json() {
        written.push(write_report_json(result, dir)?);
        written.push(write_samples_json(result, dir)?);
    }
    if format.markdown() {
        written.push(write_summary(result, dir)?);
    }
    Ok(written)
}
