/*!
 * Reporting functionality for dumptext
 *
 * Collects per-run statistics and renders them as console tables with
 * the tabled library.
 */

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use strum::IntoEnumIterator;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::{FailureKind, ReadFailure};
use crate::scanner::WalkSummary;
use crate::utils::format_file_size;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// A file that was left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path as printed in the diagnostic
    pub path: String,
    /// Failure class
    pub kind: FailureKind,
    /// Failure message
    pub reason: String,
}

/// Statistics gathered over one run
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    /// Number of records written
    pub files_written: usize,
    /// Total number of lines written
    pub total_lines: usize,
    /// Total number of characters written
    pub total_chars: usize,
    /// Size of the output file
    pub bytes_written: u64,
    /// Files excluded by extension
    pub files_filtered: usize,
    /// Folders never entered
    pub folders_pruned: usize,
    /// Subdirectories that could not be listed
    pub unreadable_dirs: usize,
    /// Details for each written file, keyed by path
    pub file_details: BTreeMap<String, FileReportInfo>,
    /// Files skipped because they could not be read
    pub skipped: Vec<SkippedFile>,
}

impl RunStatistics {
    /// Account for a file that made it into the output
    pub fn record_file(&mut self, path: &Path, content: &str) {
        let info = FileReportInfo {
            lines: content.lines().count(),
            chars: content.chars().count(),
        };
        self.files_written += 1;
        self.total_lines += info.lines;
        self.total_chars += info.chars;
        self.file_details.insert(path.display().to_string(), info);
    }

    /// Account for a file that could not be read
    pub fn record_skip(&mut self, path: &Path, failure: &ReadFailure) {
        self.skipped.push(SkippedFile {
            path: path.display().to_string(),
            kind: failure.kind(),
            reason: failure.to_string(),
        });
    }

    /// Fold in the walker's counters
    pub fn absorb(&mut self, summary: WalkSummary) {
        self.files_filtered = summary.files_filtered;
        self.folders_pruned = summary.folders_pruned;
        self.unreadable_dirs = summary.unreadable_dirs;
    }

    /// Number of skipped files of a given kind
    pub fn skipped_of(&self, kind: FailureKind) -> usize {
        self.skipped.iter().filter(|s| s.kind == kind).count()
    }
}

/// Statistics for a finished run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to walk and write
    pub duration: Duration,
    /// Counters collected during the run
    pub statistics: RunStatistics,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, cut at a separator
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut kept = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            kept.push(part);
            current_len += part_len;
        }

        if kept.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in kept.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Written".to_string(),
                value: self.format_number(stats.files_written),
            },
            SummaryRow {
                key: "⚠️ Files Skipped".to_string(),
                value: self.format_number(stats.skipped.len()),
            },
            SummaryRow {
                key: "🚫 Filtered by Extension".to_string(),
                value: self.format_number(stats.files_filtered),
            },
            SummaryRow {
                key: "✂️ Folders Pruned".to_string(),
                value: self.format_number(stats.folders_pruned),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(stats.total_lines),
            },
            SummaryRow {
                key: "💾 Output Size".to_string(),
                value: format_file_size(stats.bytes_written),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(stats.total_chars / 4)
                ),
            },
        ];

        if stats.unreadable_dirs > 0 {
            rows.push(SummaryRow {
                key: "🔒 Unreadable Folders".to_string(),
                value: self.format_number(stats.unreadable_dirs),
            });
        }

        Self::styled(Table::new(rows))
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let details = &report.statistics.file_details;
        let mut files: Vec<_> = details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if details.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn create_skipped_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SkipRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Kind")]
            kind: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkipRow> = report
            .statistics
            .skipped
            .iter()
            .map(|s| SkipRow {
                path: self.format_path(&s.path, 50),
                kind: s.kind.to_string(),
                reason: s.reason.clone(),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn skipped_breakdown(&self, stats: &RunStatistics) -> String {
        FailureKind::iter()
            .map(|kind| (kind, stats.skipped_of(kind)))
            .filter(|(_, count)| *count > 0)
            .map(|(kind, count)| format!("{}: {}", kind, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let stats = &report.statistics;
        let files_title = if stats.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  WRITTEN FILES"
        };

        let mut sections = vec![format!(
            "{}\n{}",
            files_title,
            self.create_files_table(report)
        )];

        if !stats.skipped.is_empty() {
            sections.push(format!(
                "⚠️  SKIPPED FILES ({})\n{}",
                self.skipped_breakdown(stats),
                self.create_skipped_table(report)
            ));
        }

        sections.push(format!(
            "✅  DUMP COMPLETE\n{}",
            self.create_summary_table(report)
        ));

        sections.join("\n\n")
    }
}
