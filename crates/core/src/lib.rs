// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pathbench core: a latency harness comparing two access paths to one store.
//!
//! The same workloads run through a *primary* path (a direct binding) and an
//! *alternate* path (a network driver). Every operation becomes a
//! [`SampleRecord`]; the [`report`] module turns the log into per-backend
//! statistics and alternate-over-primary speedup ratios.
//!
//! # Quick Start
//!
//! ```ignore
//! use pathbench_core::{Harness, RunOptions};
//!
//! let mut harness = Harness::new(primary, alternate, RunOptions::default());
//! let report = harness.run_full_benchmark(1_000, 10).await?;
//! println!("alternate/primary mean: {:.2}x", report.speedup.mean);
//! ```
//!
//! # Modules
//!
//! - [`backend`] - The `Backend` contract both access paths implement
//! - [`query`] - Query descriptors and results
//! - [`recorder`] - Timing and the shared sample log
//! - [`stats`] - Descriptive statistics
//! - [`workloads`] - Seeding, warmup, suites and load loops
//! - [`report`] - Comparative report builder
//! - [`orchestrator`] - Phase sequencing for a full run

#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod dataset;
pub mod error;
pub mod orchestrator;
pub mod query;
pub mod recorder;
pub mod report;
pub mod sample;
pub mod stats;
pub mod workloads;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{Backend, BackendKind};
pub use config::RunOptions;
pub use error::{BackendError, HarnessError};
pub use orchestrator::{Harness, Phase};
pub use query::{Query, QueryKind, QueryOutcome, Row, Value};
pub use recorder::SampleLog;
pub use report::{build_report, BenchmarkReport, CategoryBreakdown, SpeedupRatios};
pub use sample::{OperationMeta, SampleRecord};
pub use stats::{compute_stats, DurationStats, StatsSummary};
