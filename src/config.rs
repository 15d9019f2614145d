/*!
 * Configuration handling for dumptext
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::{DumpTextError, Result};
use crate::filter::SkipRules;

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "all_content.txt";

/// Folder names that are never descended into
pub const DEFAULT_FOLDERS_TO_SKIP: &[&str] = &[
    "venv",
    "__pycache__",
    ".git",
    "bkp",
    "node_modules",
    "dist",
    "migrations",
    "build",
    ".idea",
    ".gitignore",
    ".vscode",
    "tests",
    "docs",
    ".next",
];

/// File suffixes that are never read.
///
/// `.config.js`, ` copy.js` and the `.tmp.*` entries are not plain suffixes
/// and never match; they are reported at startup rather than reinterpreted.
pub const DEFAULT_EXTENSIONS_TO_SKIP: &[&str] = &[
    ".json",
    ".txt",
    ".svg",
    ".jpg",
    ".gitignore",
    ".png",
    ".ico",
    ".exe",
    ".zip",
    ".bin",
    ".dll",
    ".so",
    ".dylib",
    ".class",
    ".jar",
    ".pyc",
    ".pyo",
    ".db",
    ".sqlite",
    ".mp3",
    ".mp4",
    ".avi",
    ".mov",
    ".pdf",
    ".docx",
    ".xlsx",
    ".pptx",
    ".ttf",
    ".woff",
    ".woff2",
    ".eot",
    ".otf",
    ".config.js",
    " copy.js",
    ".tmp.drivedownload",
    ".tmp.driveupload",
];

fn default_skip_folders() -> Vec<String> {
    DEFAULT_FOLDERS_TO_SKIP.iter().map(|s| s.to_string()).collect()
}

fn default_skip_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS_TO_SKIP
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Command-line arguments for dumptext
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "dumptext",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate the text files of a directory tree into a single file",
    long_about = "Walks a directory tree, skips configured folder names and file extensions, and writes every remaining text file into one output file, each prefixed by a `--- File: <path> ---` header."
)]
pub struct Args {
    /// Directory to scan
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output text file name (overwritten on every run)
    #[clap(default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Comma-separated folder names never descended into (replaces the defaults)
    #[clap(long, value_delimiter = ',', default_values_t = default_skip_folders())]
    pub skip_folders: Vec<String>,

    /// Comma-separated file suffixes never read, e.g. `.png,.lock` (replaces the defaults)
    #[clap(long, value_delimiter = ',', default_values_t = default_skip_extensions())]
    pub skip_extensions: Vec<String>,

    /// Skip files larger than this many bytes
    #[clap(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Descend into symlinked directories
    #[clap(long)]
    pub follow_links: bool,

    /// Hide the progress bar
    #[clap(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to scan
    pub target_dir: PathBuf,

    /// Output text file path
    pub output_file: PathBuf,

    /// Folder names excluded from descent at any depth
    pub skip_folders: Vec<String>,

    /// File suffixes excluded from reading, lower-case
    pub skip_extensions: Vec<String>,

    /// Size cap for input files, in bytes
    pub max_file_size: Option<u64>,

    /// Whether symlinked directories are walked
    pub follow_links: bool,

    /// Whether to draw a progress bar
    pub progress: bool,
}

impl Config {
    /// Create a configuration with the default skip lists
    pub fn new(target_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_file: output_file.into(),
            skip_folders: default_skip_folders(),
            skip_extensions: default_skip_extensions(),
            max_file_size: None,
            follow_links: false,
            progress: false,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory_path),
            output_file: PathBuf::from(args.output_file),
            skip_folders: args.skip_folders,
            skip_extensions: args
                .skip_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            max_file_size: args.max_file_size,
            follow_links: args.follow_links,
            progress: !args.no_progress,
        }
    }

    /// Skip rules derived from this configuration
    pub fn skip_rules(&self) -> SkipRules {
        SkipRules::from_config(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let target = &self.target_dir;
        crate::ensure!(target.exists(), PathNotFound, "{}", target.display());
        crate::ensure!(target.is_dir(), NotADirectory, "{}", target.display());

        fs::read_dir(target).map_err(|source| DumpTextError::UnreadableRoot {
            path: target.display().to_string(),
            source,
        })?;

        // Check if output file directory exists
        if let Some(parent) = self.output_file.parent() {
            if !parent.exists() && parent != Path::new("") {
                crate::bail!(Config, "Output directory not found: {}", parent.display());
            }
        }

        crate::ensure!(
            !self.output_file.is_dir(),
            Config,
            "Output path is a directory: {}",
            self.output_file.display()
        );

        if self.max_file_size == Some(0) {
            crate::bail!(Config, "--max-file-size must be greater than zero");
        }

        Ok(())
    }
}
