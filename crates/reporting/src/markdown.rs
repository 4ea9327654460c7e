//! Markdown output generation for run results.

use crate::result::BenchmarkResult;
use pathbench_core::{BackendKind, SampleRecord, StatsSummary};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Distinct failure kinds listed per run.
const MAX_FAILURE_ROWS: usize = 20;

/// Longest error text shown in the failures table.
const MAX_ERROR_CHARS: usize = 80;

/// Generate the Markdown summary of a run.
pub fn generate_summary(result: &BenchmarkResult) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut output, result);
    output
}

/// Write the Markdown summary of a run into `out`.
pub fn write_summary<W: Write>(out: &mut W, result: &BenchmarkResult) -> fmt::Result {
    let meta = &result.metadata;
    let report = &result.report;

    writeln!(out, "# Pathbench Summary")?;
    writeln!(out)?;
    writeln!(out, "- Run: `{}`", meta.run_id)?;
    writeln!(out, "- Started: {}", meta.started_at.to_rfc3339())?;
    if let Some(elapsed) = meta.elapsed_secs() {
        writeln!(out, "- Duration: {elapsed:.1}s")?;
    }
    writeln!(out, "- Primary: `{}`", meta.primary_backend)?;
    writeln!(out, "- Alternate: `{}`", meta.alternate_backend)?;
    writeln!(
        out,
        "- Parameters: scale {}, iterations {}, concurrency {}, load phases {}",
        meta.options.scale,
        meta.options.iterations,
        meta.options.concurrency,
        if meta.options.include_load { "on" } else { "off" }
    )?;
    writeln!(out)?;

    writeln!(out, "## Overall")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Backend | Ops | Success | Mean (ms) | Median (ms) | p95 (ms) | p99 (ms) | Min (ms) | Max (ms) | Std dev (ms) |"
    )?;
    writeln!(
        out,
        "|---------|-----|---------|-----------|-------------|----------|----------|----------|----------|--------------|"
    )?;
    for kind in BackendKind::ALL {
        summary_row(out, meta.backend_name(kind), report.summary(kind))?;
    }
    writeln!(out)?;

    writeln!(out, "## Speedup (alternate / primary)")?;
    writeln!(out)?;
    writeln!(out, "| Mean | Median | p95 |")?;
    writeln!(out, "|------|--------|-----|")?;
    writeln!(
        out,
        "| {:.2}x | {:.2}x | {:.2}x |",
        report.speedup.mean, report.speedup.median, report.speedup.p95
    )?;
    writeln!(out)?;

    writeln!(out, "## Categories")?;
    writeln!(out)?;
    if report.categories.is_empty() {
        writeln!(out, "_No category has successful samples on both backends._")?;
    } else {
        writeln!(
            out,
            "| Category | Primary mean (ms) | Alternate mean (ms) | Primary p95 (ms) | Alternate p95 (ms) | Speedup (mean) |"
        )?;
        writeln!(
            out,
            "|----------|-------------------|---------------------|------------------|--------------------|----------------|"
        )?;
        for (category, breakdown) in &report.categories {
            writeln!(
                out,
                "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.2}x |",
                category,
                breakdown.primary.durations.mean,
                breakdown.alternate.durations.mean,
                breakdown.primary.durations.p95,
                breakdown.alternate.durations.p95,
                breakdown.speedup.mean
            )?;
        }
    }

    let omitted = omitted_categories(&report.samples, |c| report.categories.contains_key(c));
    if !omitted.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "Omitted (no successful sample on one backend): {}",
            omitted.join(", ")
        )?;
    }
    writeln!(out)?;

    let failures = failure_groups(&report.samples);
    if !failures.is_empty() {
        writeln!(out, "## Failures")?;
        writeln!(out)?;
        writeln!(out, "| Label | Backend | Count | Error |")?;
        writeln!(out, "|-------|---------|-------|-------|")?;
        for ((label, backend), (count, error)) in failures.iter().take(MAX_FAILURE_ROWS) {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                label,
                backend,
                count,
                escape_cell(error)
            )?;
        }
        if failures.len() > MAX_FAILURE_ROWS {
            writeln!(out)?;
            writeln!(
                out,
                "_{} more failing operations not shown._",
                failures.len() - MAX_FAILURE_ROWS
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "---")?;
    writeln!(out, "Total samples: {}", report.samples.len())?;

    Ok(())
}

fn summary_row<W: Write>(out: &mut W, name: &str, stats: &StatsSummary) -> fmt::Result {
    let d = &stats.durations;
    writeln!(
        out,
        "| {} | {} | {:.1}% | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |",
        name,
        stats.total_operations,
        stats.success_rate * 100.0,
        d.mean,
        d.median,
        d.p95,
        d.p99,
        d.min,
        d.max,
        d.std_dev
    )
}

/// Categories present in the samples but absent from the breakdown.
fn omitted_categories<'a>(
    samples: &'a [SampleRecord],
    included: impl Fn(&str) -> bool,
) -> Vec<&'a str> {
    let mut omitted: Vec<&str> = samples
        .iter()
        .filter_map(|s| s.category.as_deref())
        .filter(|c| !included(*c))
        .collect();
    omitted.sort_unstable();
    omitted.dedup();
    omitted
}

/// Failed samples grouped by label and backend, with the first error seen.
fn failure_groups(samples: &[SampleRecord]) -> BTreeMap<(&str, BackendKind), (usize, &str)> {
    let mut groups = BTreeMap::new();
    for sample in samples.iter().filter(|s| !s.success) {
        let entry = groups
            .entry((sample.label.as_str(), sample.backend))
            .or_insert((0, sample.error.as_deref().unwrap_or("")));
        entry.0 += 1;
    }
    groups
}

fn escape_cell(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let escaped = flat.replace('|', "\\|");
    if escaped.chars().count() > MAX_ERROR_CHARS {
        let short: String = escaped.chars().take(MAX_ERROR_CHARS - 3).collect();
        format!("{short}...")
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::RunMetadata;
    use pathbench_core::{build_report, RunOptions};

    fn sample(label: &str, category: &str, backend: BackendKind, ms: f64, error: Option<&str>) -> SampleRecord {
        SampleRecord {
            label: label.into(),
            category: Some(category.into()),
            description: None,
            query_text: None,
            backend,
            duration_ms: ms,
            success: error.is_none(),
            error: error.map(String::from),
            affected_records: None,
        }
    }

    fn result() -> BenchmarkResult {
        let log = vec![
            sample("point_lookup_user", "point_lookup", BackendKind::Primary, 1.0, None),
            sample("point_lookup_user", "point_lookup", BackendKind::Alternate, 3.0, None),
            sample("bulk_read_orders", "bulk_read", BackendKind::Primary, 2.0, None),
            sample(
                "bulk_read_orders",
                "bulk_read",
                BackendKind::Alternate,
                5.0,
                Some("HTTP 500: internal | error"),
            ),
        ];
        BenchmarkResult::new(
            RunMetadata::start(RunOptions::default(), "postgres-direct", "http-sql"),
            build_report(&log),
        )
    }

    #[test]
    fn test_summary_sections() {
        let summary = generate_summary(&result());

        assert!(summary.starts_with("# Pathbench Summary"));
        assert!(summary.contains("## Overall"));
        assert!(summary.contains("| postgres-direct | 2 | 100.0% |"));
        assert!(summary.contains("| http-sql | 2 | 50.0% |"));
        assert!(summary.contains("| point_lookup | 1.000 | 3.000 |"));
        assert!(summary.contains("Total samples: 4"));
    }

    #[test]
    fn test_omitted_categories_are_listed() {
        let summary = generate_summary(&result());
        assert!(summary.contains("Omitted (no successful sample on one backend): bulk_read"));
        assert!(!summary.contains("| bulk_read |"));
    }

    #[test]
    fn test_failures_table_escapes_pipes() {
        let summary = generate_summary(&result());
        assert!(summary.contains("## Failures"));
        assert!(summary.contains("| bulk_read_orders | alternate | 1 | HTTP 500: internal \\| error |"));
    }

    #[test]
    fn test_empty_report() {
        let result = BenchmarkResult::new(
            RunMetadata::start(RunOptions::default(), "p", "a"),
            build_report(&[]),
        );
        let summary = generate_summary(&result);
        assert!(summary.contains("_No category has successful samples on both backends._"));
        assert!(!summary.contains("## Failures"));
    }

    #[test]
    fn test_long_errors_are_truncated() {
        let long = "x".repeat(200);
        let cell = escape_cell(&long);
        assert_eq!(cell.chars().count(), MAX_ERROR_CHARS);
        assert!(cell.ends_with("..."));
    }
}
