/*!
 * Utility functions for dumptext
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::subscriber::{self, NoSubscriber};

use crate::config::Config;
use crate::error::Result;
use crate::scanner::Scanner;

/// Count the files a run would try to read, for progress tracking.
///
/// Logging is muted while counting; the real run reports the same entries.
pub fn count_files(config: &Config) -> Result<u64> {
    let scanner = Scanner::new(config.clone(), Arc::new(ProgressBar::hidden()));
    let summary = subscriber::with_default(NoSubscriber::default(), || scanner.walk(|_| Ok(())))?;
    Ok(summary.files_visited as u64)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
