// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for backends and the harness.

use crate::orchestrator::Phase;
use thiserror::Error;

/// Errors a backend call can fail with.
///
/// These are recorded on the failing sample and never abort a run on their own.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed the statement
    #[error("Query error: {0}")]
    Query(String),

    /// The HTTP driver got a non-success status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// A response could not be decoded into rows
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Run-level failures surfaced to the caller of the orchestrator.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A phase could not begin; no report is produced
    #[error("Setup failed during {phase}: {source}")]
    Setup {
        /// Phase whose setup failed
        phase: Phase,
        /// Underlying backend failure
        #[source]
        source: BackendError,
    },

    /// Run options outside their accepted ranges
    #[error("Invalid run options: {0}")]
    InvalidOptions(String),
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
