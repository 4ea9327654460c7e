// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Comparative report built from a sample log.
//!
//! The report is a pure function of the log: building it twice from the same
//! samples yields identical values. Categories are kept in a [`BTreeMap`] so
//! serialized output is stable too.

use crate::backend::BackendKind;
use crate::sample::SampleRecord;
use crate::stats::StatsSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alternate-over-primary latency ratios.
///
/// A value above 1 means the primary path is faster. Every ratio is 0 when the
/// primary statistic it divides by is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedupRatios {
    /// Ratio of means
    pub mean: f64,
    /// Ratio of medians
    pub median: f64,
    /// Ratio of 95th percentiles
    pub p95: f64,
}

impl SpeedupRatios {
    /// Derive ratios from the two per-backend summaries.
    pub fn between(primary: &StatsSummary, alternate: &StatsSummary) -> Self {
        Self {
            mean: ratio(alternate.durations.mean, primary.durations.mean),
            median: ratio(alternate.durations.median, primary.durations.median),
            p95: ratio(alternate.durations.p95, primary.durations.p95),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Per-backend statistics for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Primary path statistics
    pub primary: StatsSummary,
    /// Alternate path statistics
    pub alternate: StatsSummary,
    /// Alternate-over-primary ratios
    pub speedup: SpeedupRatios,
}

/// The terminal artifact of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Every sample of the run, in log order
    pub samples: Vec<SampleRecord>,
    /// Primary path statistics across all categories
    pub primary: StatsSummary,
    /// Alternate path statistics across all categories
    pub alternate: StatsSummary,
    /// Alternate-over-primary ratios across all categories
    pub speedup: SpeedupRatios,
    /// Per-category breakdown, only for categories with successes on both paths
    pub categories: BTreeMap<String, CategoryBreakdown>,
}

impl BenchmarkReport {
    /// Summary for one backend.
    pub fn summary(&self, backend: BackendKind) -> &StatsSummary {
        match backend {
            BackendKind::Primary => &self.primary,
            BackendKind::Alternate => &self.alternate,
        }
    }

    /// Samples recorded under `category`.
    pub fn samples_in<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a SampleRecord> + 'a {
        self.samples
            .iter()
            .filter(move |s| s.category.as_deref() == Some(category))
    }
}

/// Build the comparative report for a sample log.
pub fn build_report(samples: &[SampleRecord]) -> BenchmarkReport {
    let primary = StatsSummary::for_backend(samples, BackendKind::Primary);
    let alternate = StatsSummary::for_backend(samples, BackendKind::Alternate);

    let mut groups: BTreeMap<&str, Vec<&SampleRecord>> = BTreeMap::new();
    for sample in samples {
        if let Some(category) = sample.category.as_deref() {
            groups.entry(category).or_default().push(sample);
        }
    }

    let categories = groups
        .into_iter()
        .filter_map(|(category, records)| {
            let primary =
                StatsSummary::for_backend(records.iter().copied(), BackendKind::Primary);
            let alternate =
                StatsSummary::for_backend(records.iter().copied(), BackendKind::Alternate);

            if primary.successful_operations == 0 || alternate.successful_operations == 0 {
                return None;
            }

            Some((
                category.to_string(),
                CategoryBreakdown {
                    speedup: SpeedupRatios::between(&primary, &alternate),
                    primary,
                    alternate,
                },
            ))
        })
        .collect();

    BenchmarkReport {
        samples: samples.to_vec(),
        speedup: SpeedupRatios::between(&primary, &alternate),
        primary,
        alternate,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(category: Option<&str>, backend: BackendKind, ms: f64, success: bool) -> SampleRecord {
        SampleRecord {
            label: "op".into(),
            category: category.map(String::from),
            description: None,
            query_text: None,
            backend,
            duration_ms: ms,
            success,
            error: (!success).then(|| "failed".to_string()),
            affected_records: success.then_some(1),
        }
    }

    fn mixed_log() -> Vec<SampleRecord> {
        vec![
            sample(Some("point_lookup"), BackendKind::Primary, 1.0, true),
            sample(Some("point_lookup"), BackendKind::Alternate, 4.0, true),
            sample(Some("point_lookup"), BackendKind::Primary, 3.0, true),
            sample(Some("point_lookup"), BackendKind::Alternate, 8.0, true),
            sample(Some("join"), BackendKind::Primary, 2.0, true),
            sample(Some("join"), BackendKind::Alternate, 9.0, false),
            sample(None, BackendKind::Alternate, 100.0, true),
        ]
    }

    #[test]
    fn test_speedup_is_alternate_over_primary() {
        let report = build_report(&mixed_log());
        let breakdown = &report.categories["point_lookup"];
        assert_eq!(breakdown.primary.durations.mean, 2.0);
        assert_eq!(breakdown.alternate.durations.mean, 6.0);
        assert_eq!(breakdown.speedup.mean, 3.0);
        assert_eq!(breakdown.speedup.median, 3.0);
    }

    #[test]
    fn test_category_requires_success_on_both_paths() {
        let report = build_report(&mixed_log());
        assert!(report.categories.contains_key("point_lookup"));
        assert!(!report.categories.contains_key("join"));
        assert_eq!(report.categories.len(), 1);
    }

    #[test]
    fn test_uncategorized_samples_count_towards_totals() {
        let report = build_report(&mixed_log());
        assert_eq!(report.alternate.total_operations, 4);
        assert_eq!(report.alternate.successful_operations, 3);
        assert_eq!(report.alternate.success_rate, 0.75);
        assert_eq!(report.primary.success_rate, 1.0);
    }

    #[test]
    fn test_zero_denominator_speedup() {
        let log = vec![
            sample(Some("bulk_read"), BackendKind::Primary, 5.0, false),
            sample(Some("bulk_read"), BackendKind::Alternate, 7.0, true),
        ];
        let report = build_report(&log);

        assert_eq!(report.speedup, SpeedupRatios::default());
        assert!(report.speedup.mean.is_finite());
        assert!(report.categories.is_empty());
    }

    #[test]
    fn test_empty_log() {
        let report = build_report(&[]);
        assert!(report.samples.is_empty());
        assert_eq!(report.primary, StatsSummary::default());
        assert_eq!(report.speedup, SpeedupRatios::default());
    }

    #[test]
    fn test_build_is_idempotent() {
        let log = mixed_log();
        let first = build_report(&log);
        let second = build_report(&log);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(log, mixed_log());
    }

    #[test]
    fn test_samples_in_category() {
        let report = build_report(&mixed_log());
        assert_eq!(report.samples_in("point_lookup").count(), 4);
        assert_eq!(report.samples_in("join").count(), 2);
        assert_eq!(report.summary(BackendKind::Primary), &report.primary);
    }
}
