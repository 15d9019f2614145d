/*!
 * Command-line interface for dumptext
 */

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dumptext::config::{Args, Config};
use dumptext::report::{ReportFormat, Reporter, ScanReport};
use dumptext::utils::count_files;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "dumptext", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let config = Config::from_args(args);
    config.validate()?;

    let unreachable = config.skip_rules().unreachable_extensions().join(", ");
    if !unreachable.is_empty() {
        warn!(
            entries = %unreachable,
            "skip-extensions entries are not plain file suffixes and will never match"
        );
    }

    let progress = progress_bar(config.progress);
    progress.set_prefix("📊 Setup");
    progress.set_message(format!(
        "📂 Scanning directory: {}",
        config.target_dir.display()
    ));

    // Count files for progress tracking
    let total_files = match count_files(&config) {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "failed to count files");
            0
        }
    };
    progress.set_length(total_files);
    progress.set_prefix("📊 Writing");

    let start_time = Instant::now();
    let statistics = dumptext::dump(&config, Arc::new(progress.clone()))?;
    let duration = start_time.elapsed();

    progress.finish_and_clear();

    println!(
        "Content successfully written to {}",
        config.output_file.display()
    );

    let report = ScanReport {
        output_file: config.output_file.display().to_string(),
        duration,
        statistics,
    };
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}
