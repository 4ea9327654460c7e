// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run parameters, their defaults and accepted ranges.
//!
//! The harness runs with whatever it is given; [`RunOptions::validate`] is
//! for callers that want to reject out-of-range input up front.

use crate::dataset::DEFAULT_PROBE;
use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted range for `scale` (users seeded).
pub const SCALE_RANGE: RangeInclusive<usize> = 1..=100_000;
/// Accepted range for `iterations` (repetitions per suite).
pub const ITERATIONS_RANGE: RangeInclusive<usize> = 0..=10_000;
/// Accepted range for `concurrency` (streams per backend).
pub const CONCURRENCY_RANGE: RangeInclusive<usize> = 1..=256;
/// Accepted range for `batch_size` (rows per seeding insert).
pub const BATCH_SIZE_RANGE: RangeInclusive<usize> = 1..=1_000;

/// Parameters for one orchestrated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Parent records to seed
    pub scale: usize,
    /// Repetitions per suite and per concurrent stream
    pub iterations: usize,
    /// Concurrent streams per backend in the concurrent-load phase
    pub concurrency: usize,
    /// Trivial round-trips per backend before measuring
    pub warmup_rounds: usize,
    /// Rows per seeding insert
    pub batch_size: usize,
    /// Run sequential load, concurrent load and the raw query probe
    pub include_load: bool,
    /// Read-only SQL issued by the raw query probe
    pub probe_query: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scale: 1_000,
            iterations: 10,
            concurrency: 10,
            warmup_rounds: 5,
            batch_size: 100,
            include_load: true,
            probe_query: DEFAULT_PROBE.to_string(),
        }
    }
}

impl RunOptions {
    /// Check every parameter against its accepted range.
    pub fn validate(&self) -> Result<()> {
        check("scale", self.scale, SCALE_RANGE)?;
        check("iterations", self.iterations, ITERATIONS_RANGE)?;
        check("concurrency", self.concurrency, CONCURRENCY_RANGE)?;
        check("batch_size", self.batch_size, BATCH_SIZE_RANGE)?;

        if self.probe_query.trim().is_empty() {
            return Err(HarnessError::InvalidOptions(
                "probe_query must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn check(name: &str, value: usize, range: RangeInclusive<usize>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(HarnessError::InvalidOptions(format!(
            "{name} = {value} is outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RunOptions::default().validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_is_valid() {
        let options = RunOptions {
            iterations: 0,
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let options = RunOptions {
            scale: 0,
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("scale = 0"));

        let options = RunOptions {
            concurrency: 1_000,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let options: RunOptions = serde_json::from_str(r#"{"scale": 50}"#).unwrap();
        assert_eq!(options.scale, 50);
        assert_eq!(options.iterations, 10);
        assert!(options.include_load);
    }
}
