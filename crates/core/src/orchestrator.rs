// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run orchestration.
//!
//! A run walks a fixed, linear sequence of phases:
//!
//! ```text
//! Idle → Warmup → Seeding → QuerySuites
//!      → [SequentialLoad → ConcurrentLoad → RawQueryProbe]
//!      → Cleanup → Reported
//! ```
//!
//! Operation failures inside a phase end up in the sample log. Only setup
//! failures (a backend that cannot be reached, a schema or dataset that cannot
//! be written) abort the run, and then no report is produced.

use crate::backend::{Backend, BackendKind};
use crate::config::RunOptions;
use crate::dataset::DatasetShape;
use crate::error::{BackendError, HarnessError, Result};
use crate::recorder::SampleLog;
use crate::report::{build_report, BenchmarkReport};
use crate::workloads::Workloads;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Stage of an orchestrated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing running
    Idle,
    /// Reachability checks and warmup round-trips
    Warmup,
    /// Schema creation and data seeding
    Seeding,
    /// Single-shot query suites
    QuerySuites,
    /// Rotating sequential load
    SequentialLoad,
    /// Parallel streams, one backend at a time
    ConcurrentLoad,
    /// Caller-supplied probe query
    RawQueryProbe,
    /// Seeded data removal
    Cleanup,
    /// Report built
    Reported,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Warmup => "warmup",
            Phase::Seeding => "seeding",
            Phase::QuerySuites => "query_suites",
            Phase::SequentialLoad => "sequential_load",
            Phase::ConcurrentLoad => "concurrent_load",
            Phase::RawQueryProbe => "raw_query_probe",
            Phase::Cleanup => "cleanup",
            Phase::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Owns both backends and the sample log for the duration of a run.
pub struct Harness {
    primary: Arc<dyn Backend>,
    alternate: Arc<dyn Backend>,
    log: SampleLog,
    options: RunOptions,
    phase: Phase,
}

impl Harness {
    /// Create a harness over two backends.
    pub fn new<P, A>(primary: P, alternate: A, options: RunOptions) -> Self
    where
        P: Backend + 'static,
        A: Backend + 'static,
    {
        Self {
            primary: Arc::new(primary),
            alternate: Arc::new(alternate),
            log: SampleLog::new(),
            options,
            phase: Phase::Idle,
        }
    }

    /// Options used by [`Harness::run`].
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Samples of the current or last run.
    pub fn log(&self) -> &SampleLog {
        &self.log
    }

    /// Display name of one backend.
    pub fn backend_name(&self, kind: BackendKind) -> &str {
        match kind {
            BackendKind::Primary => self.primary.name(),
            BackendKind::Alternate => self.alternate.name(),
        }
    }

    /// Run with the configured scale and iteration count.
    pub async fn run(&mut self) -> Result<BenchmarkReport> {
        let (scale, iterations) = (self.options.scale, self.options.iterations);
        self.run_full_benchmark(scale, iterations).await
    }

    /// Run every phase and return the comparative report.
    ///
    /// The previous run's samples are discarded first.
    #[instrument(skip(self), fields(primary = %self.primary.name(), alternate = %self.alternate.name()))]
    pub async fn run_full_benchmark(
        &mut self,
        scale: usize,
        iterations: usize,
    ) -> Result<BenchmarkReport> {
        self.phase = Phase::Idle;
        self.log.clear();

        let workloads = Workloads::new(
            Arc::clone(&self.primary),
            Arc::clone(&self.alternate),
            self.log.clone(),
            DatasetShape::for_scale(scale),
        );

        self.enter(Phase::Warmup);
        for backend in [&self.primary, &self.alternate] {
            backend.health_check().await.map_err(setup(Phase::Warmup))?;
        }
        workloads.warmup(self.options.warmup_rounds).await;

        self.enter(Phase::Seeding);
        workloads.ensure_schema().await.map_err(setup(Phase::Seeding))?;
        // Rows left behind by an aborted run would collide with the seed ids.
        workloads.cleanup().await.map_err(setup(Phase::Seeding))?;
        if let Err(source) = workloads.seed(self.options.batch_size).await {
            if let Err(err) = workloads.cleanup().await {
                warn!(error = %err, "cleanup after failed seeding also failed");
            }
            return Err(setup(Phase::Seeding)(source));
        }

        self.enter(Phase::QuerySuites);
        workloads.query_suites(iterations).await;

        if self.options.include_load {
            self.enter(Phase::SequentialLoad);
            workloads.sequential_load(iterations).await;

            self.enter(Phase::ConcurrentLoad);
            workloads
                .concurrent_load(self.options.concurrency, iterations)
                .await;

            self.enter(Phase::RawQueryProbe);
            workloads
                .raw_query_probe(&self.options.probe_query, iterations)
                .await;
        }

        self.enter(Phase::Cleanup);
        if let Err(err) = workloads.cleanup().await {
            warn!(error = %err, "cleanup failed, benchmark rows left in store");
        }

        self.enter(Phase::Reported);
        let report = build_report(&self.log.snapshot());
        info!(
            samples = report.samples.len(),
            primary_success_rate = report.primary.success_rate,
            alternate_success_rate = report.alternate.success_rate,
            speedup_mean = report.speedup.mean,
            "benchmark complete"
        );

        Ok(report)
    }

    fn enter(&mut self, phase: Phase) {
        debug_assert!(phase > self.phase, "phase {phase} after {}", self.phase);
        info!(%phase, "entering phase");
        self.phase = phase;
    }
}

fn setup(phase: Phase) -> impl Fn(BackendError) -> HarnessError {
    move |source| HarnessError::Setup { phase, source }
}
