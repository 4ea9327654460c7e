//! CLI for Pathbench.
//!
//! `pathbench run` connects both access paths, runs the full harness and
//! writes the results; `pathbench status` shows the resolved settings.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod settings;
pub mod table;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pathbench_adapters::{HttpSqlBackend, PostgresBackend};
use pathbench_core::{Backend, Harness};
use pathbench_reporting::{io, BenchmarkResult, OutputFormat, RunMetadata};
use settings::{LoggingSettings, Settings};
use std::path::PathBuf;
use tracing::{info, warn};

/// Pathbench CLI.
#[derive(Parser, Debug)]
#[command(name = "pathbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML). Defaults to `pathbench.toml` when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output selection on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// report.json and samples.json
    Json,
    /// summary.md
    Markdown,
    /// All files
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Both => OutputFormat::Both,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full comparison and write results.
    ///
    /// Writes to the output directory:
    /// - report.json - run metadata and statistics
    /// - samples.json - every recorded sample
    /// - summary.md - Markdown summary
    Run {
        /// Users to seed (orders are derived from it).
        #[arg(long)]
        scale: Option<usize>,

        /// Repetitions per suite and per concurrent stream.
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Concurrent streams per backend.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip sequential load, concurrent load and the probe query.
        #[arg(long)]
        no_load: bool,

        /// Read-only SQL for the probe phase.
        #[arg(long)]
        probe_query: Option<String>,

        /// Output directory.
        #[arg(short, long, default_value = io::OUTPUT_DIR)]
        output: PathBuf,

        /// Which files to write.
        #[arg(short, long, value_enum, default_value_t = FormatArg::Both)]
        format: FormatArg,

        /// Debug-level logging.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show resolved settings, with secrets masked.
    Status {
        /// Also show run parameters and output files.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Run the CLI with the process arguments.
pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Run {
            scale,
            iterations,
            concurrency,
            no_load,
            probe_query,
            output,
            format,
            verbose,
        } => {
            let run = &mut settings.run;
            if let Some(scale) = scale {
                run.scale = scale;
            }
            if let Some(iterations) = iterations {
                run.iterations = iterations;
            }
            if let Some(concurrency) = concurrency {
                run.concurrency = concurrency;
            }
            if let Some(probe_query) = probe_query {
                run.probe_query = probe_query;
            }
            if no_load {
                run.include_load = false;
            }
            settings.run.validate()?;

            init_logging(&settings.logging, verbose);

            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            let result = runtime.block_on(run_benchmark(&settings))?;

            let written = io::write_all_outputs(&result, &output, format.into())
                .with_context(|| format!("Failed to write results to {}", output.display()))?;

            table::print_comparison(&result);
            if !table::has_comparison(&result.report.speedup) {
                warn!("primary path has no successful samples; speedup ratios are zero");
            }
            println!("Results written to {}/", output.display());
            if verbose {
                for path in &written {
                    println!("  - {}", path.display());
                }
            }

            Ok(())
        }
        Commands::Status { detailed } => {
            print_status(&settings, detailed);
            Ok(())
        }
    }
}

async fn run_benchmark(settings: &Settings) -> Result<BenchmarkResult> {
    let primary = PostgresBackend::connect(&settings.primary_for_run())
        .await
        .context("Failed to connect primary backend")?;
    let alternate =
        HttpSqlBackend::new(&settings.alternate).context("Failed to create alternate backend")?;

    let metadata = RunMetadata::start(settings.run.clone(), primary.name(), alternate.name());
    info!(run_id = %metadata.run_id, "starting run");

    let mut harness = Harness::new(primary, alternate, settings.run.clone());
    let report = harness.run().await?;

    Ok(BenchmarkResult::new(metadata, report))
}

/// Install the global tracing subscriber. `RUST_LOG` wins over settings.
fn init_logging(logging: &LoggingSettings, verbose: bool) {
    let default = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded; keep it.
    let _ = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn print_status(settings: &Settings, detailed: bool) {
    let shown = settings.redacted();

    println!("{}", "Pathbench".bold());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Primary:   {}", shown.primary.database_url);
    println!(
        "           max_connections = {} (run uses {})",
        shown.primary.max_connections,
        settings.primary_for_run().max_connections
    );
    match shown.primary.acquire_timeout_secs {
        Some(secs) => println!("           acquire_timeout = {secs}s"),
        None => println!("           acquire_timeout = none"),
    }
    println!("Alternate: {}", shown.alternate.endpoint);
    println!(
        "           auth_token = {}",
        shown.alternate.auth_token.as_deref().unwrap_or("(none)")
    );

    if detailed {
        let run = &shown.run;
        println!();
        println!("Run parameters:");
        println!("  scale         = {}", run.scale);
        println!("  iterations    = {}", run.iterations);
        println!("  concurrency   = {}", run.concurrency);
        println!("  warmup_rounds = {}", run.warmup_rounds);
        println!("  batch_size    = {}", run.batch_size);
        println!("  include_load  = {}", run.include_load);
        println!("  probe_query   = {}", run.probe_query);
        if let Err(e) = run.validate() {
            println!("  {}", e.to_string().red());
        }
        println!();
        println!("Logging: level = {}, json = {}", shown.logging.level, shown.logging.json);
        println!();
        println!("Output files:");
        println!("  - {}/{}", io::OUTPUT_DIR, io::REPORT_FILE);
        println!("  - {}/{}", io::OUTPUT_DIR, io::SAMPLES_FILE);
        println!("  - {}/{}", io::OUTPUT_DIR, io::SUMMARY_FILE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "pathbench",
            "run",
            "--scale",
            "200",
            "--iterations",
            "3",
            "--no-load",
            "--format",
            "markdown",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                scale,
                iterations,
                concurrency,
                no_load,
                output,
                format,
                ..
            } => {
                assert_eq!(scale, Some(200));
                assert_eq!(iterations, Some(3));
                assert_eq!(concurrency, None);
                assert!(no_load);
                assert_eq!(output, PathBuf::from(io::OUTPUT_DIR));
                assert_eq!(OutputFormat::from(format), OutputFormat::Markdown);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["pathbench", "status", "--config", "bench.toml", "-d"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bench.toml")));
        assert!(matches!(cli.command, Commands::Status { detailed: true }));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["pathbench", "run", "--format", "xml"]).is_err());
    }
}
