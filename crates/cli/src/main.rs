//! Pathbench CLI entry point.

fn main() {
    if let Err(e) = pathbench_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
