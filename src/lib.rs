/*!
 * dumptext - Concatenate the text files of a directory tree into one file
 *
 * Walks a directory, prunes configured folder names before descending,
 * drops configured file extensions, and writes every remaining UTF-8 file
 * as a `--- File: <path> ---` record into a single output file.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod report;
pub mod scanner;
pub mod utils;
pub mod writer;


use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

pub use config::{Args, Config};
pub use error::{DumpTextError, FailureKind, ReadFailure, Result};
pub use filter::SkipRules;
pub use report::{FileReportInfo, ReportFormat, Reporter, RunStatistics, ScanReport, SkippedFile};
pub use scanner::{Scanner, WalkSummary};
pub use utils::{count_files, format_file_size};
pub use writer::TextWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one dump: create the output file, walk the tree and write a record
/// for every readable file.
///
/// Files that cannot be read are skipped with a `Skipping file: <path> due to
/// error: <error>` line on stderr. Errors on the root or the output file
/// abort the run; the output may then be partially written.
pub fn dump(config: &Config, progress: Arc<ProgressBar>) -> Result<RunStatistics> {
    let mut out = TextWriter::create(&config.output_file)?;
    let scanner = Scanner::new(config.clone(), Arc::clone(&progress));
    let mut stats = RunStatistics::default();

    info!(
        root = %config.target_dir.display(),
        output = %config.output_file.display(),
        "dump started"
    );

    let summary = scanner.walk(|path| {
        progress.inc(1);
        progress.set_message(format!("📄 {}", path.display()));

        match writer::read_text(path, config.max_file_size) {
            Ok(content) => {
                out.write_record(path, &content)?;
                stats.record_file(path, &content);
                debug!(path = %path.display(), bytes = content.len(), "record written");
            }
            Err(failure) => {
                progress.suspend(|| {
                    eprintln!(
                        "Skipping file: {} due to error: {}",
                        path.display(),
                        failure
                    )
                });
                stats.record_skip(path, &failure);
            }
        }
        Ok(())
    })?;

    stats.bytes_written = out.bytes_written();
    out.finish()?;
    stats.absorb(summary);

    info!(
        written = stats.files_written,
        skipped = stats.skipped.len(),
        pruned = stats.folders_pruned,
        "dump finished"
    );

    Ok(stats)
}
