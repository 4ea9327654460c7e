// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Descriptive statistics over duration samples.

use crate::backend::BackendKind;
use crate::sample::SampleRecord;
use serde::{Deserialize, Serialize};

/// Duration statistics in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Compute duration statistics from an unordered set of samples.
///
/// Empty input yields all zeros. Percentile indices are `floor(n * q)`,
/// clamped to the last element.
pub fn compute_stats(durations: &[f64]) -> DurationStats {
    if durations.is_empty() {
        return DurationStats::default();
    }

    let mut sorted = durations.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;

    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let variance = sorted
        .iter()
        .map(|d| {
            let diff = d - mean;
            diff * diff
        })
        .sum::<f64>()
        / n as f64;

    DurationStats {
        mean,
        median,
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
        min: sorted[0],
        max: sorted[n - 1],
        std_dev: variance.sqrt(),
    }
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    let index = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}

/// Statistics for one partition of the sample log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Statistics over successful samples only
    #[serde(flatten)]
    pub durations: DurationStats,
    /// Attempts in the partition, failed ones included
    pub total_operations: usize,
    /// Successful attempts
    pub successful_operations: usize,
    /// `successful_operations / total_operations`, zero when nothing was attempted
    pub success_rate: f64,
}

impl StatsSummary {
    /// Summarize the samples taken through `backend`.
    ///
    /// Failed samples count towards the success-rate denominator but not
    /// towards latency statistics.
    pub fn for_backend<'a, I>(records: I, backend: BackendKind) -> Self
    where
        I: IntoIterator<Item = &'a SampleRecord>,
    {
        let mut total = 0usize;
        let mut successful = Vec::new();

        for record in records.into_iter().filter(|r| r.backend == backend) {
            total += 1;
            if record.success {
                successful.push(record.duration_ms);
            }
        }

        let success_rate = if total == 0 {
            0.0
        } else {
            successful.len() as f64 / total as f64
        };

        Self {
            durations: compute_stats(&successful),
            total_operations: total,
            successful_operations: successful.len(),
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(backend: BackendKind, duration_ms: f64, success: bool) -> SampleRecord {
        SampleRecord {
            label: "op".into(),
            category: None,
            description: None,
            query_text: None,
            backend,
            duration_ms,
            success,
            error: (!success).then(|| "boom".to_string()),
            affected_records: None,
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(compute_stats(&[]), DurationStats::default());
    }

    #[test]
    fn test_odd_length() {
        let stats = compute_stats(&[5.0, 1.0, 3.0]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.mean, 3.0);
        // floor(3 * 0.95) = 2
        assert_eq!(stats.p95, 5.0);
        assert_eq!(stats.p99, 5.0);
    }

    #[test]
    fn test_even_length_median_is_midpoint() {
        let stats = compute_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn test_population_std_dev() {
        let stats = compute_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_single_sample() {
        let stats = compute_stats(&[7.5]);
        assert_eq!(stats.min, 7.5);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.p95, 7.5);
        assert_eq!(stats.p99, 7.5);
        assert_eq!(stats.max, 7.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_percentile_indices() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        let stats = compute_stats(&samples);
        // floor(100 * 0.95) = 95 -> 96th value
        assert_eq!(stats.p95, 96.0);
        // floor(100 * 0.99) = 99 -> last value
        assert_eq!(stats.p99, 100.0);
    }

    #[test]
    fn test_ordering_properties() {
        let inputs: Vec<Vec<f64>> = vec![
            vec![0.0],
            vec![3.2, 0.1],
            vec![9.0, 1.0, 1.0, 1.0, 50.0, 2.5],
            (0..37).map(|i| ((i * 7919) % 101) as f64 / 3.0).collect(),
            (0..250).map(|i| ((i * 31) % 97) as f64).collect(),
        ];

        for input in inputs {
            let s = compute_stats(&input);
            assert!(s.min <= s.p95, "{input:?}");
            assert!(s.p95 <= s.p99, "{input:?}");
            assert!(s.p99 <= s.max, "{input:?}");
            assert!(s.min <= s.median && s.median <= s.max, "{input:?}");
            assert!(s.std_dev >= 0.0);
        }
    }

    #[test]
    fn test_order_invariance() {
        let forward: Vec<f64> = (0..64).map(|i| ((i * 13) % 41) as f64 * 0.25).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(17);

        let expected = compute_stats(&forward);
        assert_eq!(compute_stats(&reversed), expected);
        assert_eq!(compute_stats(&rotated), expected);
    }

    #[test]
    fn test_summary_excludes_failures_from_latency() {
        let records = vec![
            sample(BackendKind::Primary, 1.0, true),
            sample(BackendKind::Primary, 3.0, true),
            sample(BackendKind::Primary, 500.0, false),
            sample(BackendKind::Alternate, 10.0, true),
        ];

        let primary = StatsSummary::for_backend(&records, BackendKind::Primary);
        assert_eq!(primary.total_operations, 3);
        assert_eq!(primary.successful_operations, 2);
        assert_eq!(primary.durations.max, 3.0);
        assert!((primary.success_rate - 2.0 / 3.0).abs() < 1e-12);

        let alternate = StatsSummary::for_backend(&records, BackendKind::Alternate);
        assert_eq!(alternate.total_operations, 1);
        assert_eq!(alternate.success_rate, 1.0);
    }

    #[test]
    fn test_summary_all_failed_has_zero_latency() {
        let records = vec![
            sample(BackendKind::Alternate, 4.0, false),
            sample(BackendKind::Alternate, 6.0, false),
        ];
        let summary = StatsSummary::for_backend(&records, BackendKind::Alternate);
        assert_eq!(summary.durations, DurationStats::default());
        assert_eq!(summary.total_operations, 2);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn test_summary_no_attempts() {
        let records: Vec<SampleRecord> = Vec::new();
        let summary = StatsSummary::for_backend(&records, BackendKind::Primary);
        assert_eq!(summary.total_operations, 0);
        assert_eq!(summary.success_rate, 0.0);
    }
}
