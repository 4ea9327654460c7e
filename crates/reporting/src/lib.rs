//! Output layer for Pathbench runs.
//!
//! Wraps a [`pathbench_core::BenchmarkReport`] with run metadata and writes it
//! out as JSON and Markdown.
//!
//! # Quick Start
//!
//! ```ignore
//! use pathbench_reporting::{io, BenchmarkResult, OutputFormat, RunMetadata};
//!
//! let metadata = RunMetadata::start(options, "postgres-direct", "http-sql");
//! let report = harness.run().await?;
//! let result = BenchmarkResult::new(metadata, report);
//! io::write_all_outputs(&result, io::OUTPUT_DIR, OutputFormat::Both)?;
//! ```
//!
//! # Modules
//!
//! - [`result`] - The `BenchmarkResult` envelope and `RunMetadata`
//! - [`io`] - Writing results to disk
//! - [`markdown`] - Markdown summary generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod result;

pub use io::{write_all_outputs, OutputFormat, ReportingError};
pub use result::{BenchmarkResult, RunMetadata};
