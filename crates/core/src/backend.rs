// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The backend contract consumed by the harness.

use crate::error::BackendError;
use crate::query::{Query, QueryOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two access paths a sample was taken through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Low-latency direct binding
    Primary,
    /// Network/HTTP driver
    Alternate,
}

impl BackendKind {
    /// Both kinds, primary first.
    pub const ALL: [BackendKind; 2] = [BackendKind::Primary, BackendKind::Alternate];

    /// Stable label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Primary => "primary",
            BackendKind::Alternate => "alternate",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque query-executing access path to the benchmarked store.
///
/// Implementations must accept the same [`Query`] descriptors so that paired
/// operations are comparable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Human-readable name, e.g. `postgres-direct`.
    fn name(&self) -> &str;

    /// Execute one query and resolve to its outcome.
    async fn execute(&self, query: &Query) -> Result<QueryOutcome, BackendError>;

    /// Verify the store is reachable through this path.
    async fn health_check(&self) -> Result<(), BackendError> {
        self.execute(&Query::read("SELECT 1")).await.map(|_| ())
    }
}
