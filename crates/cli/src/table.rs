//! Colored terminal rendering of a finished run.

use colored::Colorize;
use pathbench_core::{BackendKind, SpeedupRatios, StatsSummary};
use pathbench_reporting::BenchmarkResult;

/// Print the comparison table to stdout.
pub fn print_comparison(result: &BenchmarkResult) {
    let report = &result.report;
    let meta = &result.metadata;

    println!();
    println!("{}", "Pathbench Results".bold().blue());
    println!("  Run: {}", meta.run_id);
    if let Some(elapsed) = meta.elapsed_secs() {
        println!("  Duration: {elapsed:.1}s");
    }
    println!();

    println!(
        "  {:<20} {:>8} {:>9} {:>10} {:>10} {:>10} {:>10}",
        "Backend".bold(),
        "Ops".bold(),
        "Success".bold(),
        "Mean ms".bold(),
        "Median ms".bold(),
        "p95 ms".bold(),
        "p99 ms".bold()
    );
    for kind in BackendKind::ALL {
        print_summary_row(meta.backend_name(kind), report.summary(kind));
    }
    println!();

    println!(
        "  {} mean {}  median {}  p95 {}",
        "Speedup (alternate / primary):".bold(),
        ratio(report.speedup.mean),
        ratio(report.speedup.median),
        ratio(report.speedup.p95)
    );

    if !report.categories.is_empty() {
        println!();
        println!(
            "  {:<20} {:>14} {:>14} {:>10}",
            "Category".bold(),
            "Primary ms".bold(),
            "Alternate ms".bold(),
            "Speedup".bold()
        );
        for (category, breakdown) in &report.categories {
            println!(
                "  {:<20} {:>14.3} {:>14.3} {:>10}",
                category,
                breakdown.primary.durations.mean,
                breakdown.alternate.durations.mean,
                ratio(breakdown.speedup.mean)
            );
        }
    }
    println!();
}

fn print_summary_row(name: &str, stats: &StatsSummary) {
    let rate = format!("{:.1}%", stats.success_rate * 100.0);
    let rate = if stats.success_rate >= 1.0 {
        rate.green()
    } else if stats.total_operations == 0 {
        rate.normal()
    } else {
        rate.yellow()
    };
    let d = &stats.durations;
    println!(
        "  {:<20} {:>8} {:>9} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
        name, stats.total_operations, rate, d.mean, d.median, d.p95, d.p99
    );
}

fn ratio(value: f64) -> colored::ColoredString {
    let text = format!("{value:.2}x");
    if value == 0.0 {
        text.dimmed()
    } else if value >= 1.0 {
        text.green()
    } else {
        text.red()
    }
}

/// Whether a run produced any ratio worth showing.
pub fn has_comparison(speedup: &SpeedupRatios) -> bool {
    speedup.mean > 0.0 || speedup.median > 0.0 || speedup.p95 > 0.0
}
