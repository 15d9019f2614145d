/*!
 * Directory walking with pre-descent pruning
 */

use std::cell::Cell;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::{DumpTextError, Result};
use crate::filter::SkipRules;

/// Counters collected while walking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Files handed to the visitor
    pub files_visited: usize,
    /// Files left out because of their extension
    pub files_filtered: usize,
    /// Directories never entered because of their name
    pub folders_pruned: usize,
    /// Directories below the root that could not be listed
    pub unreadable_dirs: usize,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Compiled skip rules
    rules: SkipRules,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        let rules = config.skip_rules();
        Self {
            config,
            rules,
            progress,
        }
    }

    /// Walk the target directory and call `visit` for every file to include.
    ///
    /// Directories whose name is a skip folder are dropped before they are
    /// read, so nothing below them is ever listed. Within a directory, files
    /// come before subdirectories and both are sorted by name. An error from
    /// `visit` stops the walk and is returned as is.
    pub fn walk<F>(&self, mut visit: F) -> Result<WalkSummary>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        let mut summary = WalkSummary::default();
        let pruned = Cell::new(0usize);
        let output = self.output_path();

        let walker = WalkDir::new(&self.config.target_dir)
            .follow_links(self.config.follow_links)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let skip = self.rules.should_skip_path(entry.path(), true);
                if skip {
                    debug!(path = %entry.path().display(), "folder pruned");
                    pruned.set(pruned.get() + 1);
                }
                !skip
            });

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if is_root_error(&err, &self.config.target_dir) => {
                    return Err(DumpTextError::Walk {
                        path: self.config.target_dir.display().to_string(),
                        source: err,
                    });
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    warn!(path = %path, error = %err, "skipping unreadable entry");
                    summary.unreadable_dirs += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                self.progress
                    .set_message(format!("📂 {}", entry.path().display()));
                continue;
            }

            if !self.is_candidate(&entry) {
                continue;
            }

            if self.rules.should_skip_path(entry.path(), false) {
                summary.files_filtered += 1;
                continue;
            }

            if is_same_file(entry.path(), output.as_deref()) {
                debug!(path = %entry.path().display(), "output file left out of its own dump");
                continue;
            }

            summary.files_visited += 1;
            visit(entry.path())?;
        }

        summary.folders_pruned = pruned.get();
        Ok(summary)
    }

    /// Collect every file `walk` would visit, in order
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk(|path| {
            files.push(path.to_path_buf());
            Ok(())
        })?;
        Ok(files)
    }

    /// Whether a walked entry is something to read
    fn is_candidate(&self, entry: &DirEntry) -> bool {
        let file_type = entry.file_type();
        if file_type.is_file() {
            return true;
        }
        if file_type.is_symlink() {
            // Links to files are read through; dangling links fail on read
            return match fs::metadata(entry.path()) {
                Ok(target) => {
                    if !target.is_file() && !target.is_dir() {
                        debug!(path = %entry.path().display(), "link to special file ignored");
                    }
                    target.is_file()
                }
                Err(_) => true,
            };
        }
        debug!(path = %entry.path().display(), "special file ignored");
        false
    }

    /// Canonical path of the output file, if it already exists
    fn output_path(&self) -> Option<PathBuf> {
        fs::canonicalize(&self.config.output_file).ok()
    }
}

/// Files before directories, then by name
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Whether a walk error concerns the root itself
fn is_root_error(err: &walkdir::Error, root: &Path) -> bool {
    err.depth() == 0 && err.path().map_or(true, |p| p == root)
}

fn is_same_file(path: &Path, output: Option<&Path>) -> bool {
    let Some(output) = output else {
        return false;
    };
    if path.file_name() != output.file_name() {
        return false;
    }
    fs::canonicalize(path).map_or(false, |p| p == output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn scanner_for(config: Config) -> Scanner {
        Scanner::new(config, Arc::new(ProgressBar::hidden()))
    }

    #[test]
    fn test_walk_orders_files_before_directories() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("a_dir")).unwrap();
        fs::write(root.join("a_dir").join("inner.py"), "1").unwrap();
        fs::write(root.join("z.py"), "2").unwrap();
        fs::write(root.join("b.py"), "3").unwrap();

        let config = Config::new(root, root.join("out.md"));
        let files = scanner_for(config).collect_files().unwrap();

        assert_eq!(
            files,
            vec![
                root.join("b.py"),
                root.join("z.py"),
                root.join("a_dir").join("inner.py"),
            ]
        );
    }

    #[test]
    fn test_walk_counts_pruned_and_filtered() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src").join("node_modules").join("deep")).unwrap();
        fs::write(root.join("src").join("node_modules").join("deep").join("x.js"), "").unwrap();
        fs::create_dir(root.join("__pycache__")).unwrap();
        fs::write(root.join("__pycache__").join("m.cpython.pyc"), "").unwrap();
        fs::write(root.join("logo.png"), "").unwrap();
        fs::write(root.join("main.py"), "").unwrap();

        let config = Config::new(root, root.join("out.md"));
        let scanner = scanner_for(config);
        let mut seen = Vec::new();
        let summary = scanner
            .walk(|path| {
                seen.push(path.to_path_buf());
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec![root.join("main.py")]);
        assert_eq!(summary.files_visited, 1);
        assert_eq!(summary.files_filtered, 1);
        assert_eq!(summary.folders_pruned, 2);
    }

    #[test]
    fn test_root_named_like_skip_folder_is_walked() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("build");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("setup.py"), "").unwrap();

        let config = Config::new(&root, temp.path().join("out.md"));
        let files = scanner_for(config).collect_files().unwrap();
        assert_eq!(files, vec![root.join("setup.py")]);
    }

    #[test]
    fn test_visitor_error_stops_walk() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.py"), "").unwrap();
        fs::write(temp.path().join("b.py"), "").unwrap();

        let config = Config::new(temp.path(), temp.path().join("out.md"));
        let mut calls = 0;
        let result = scanner_for(config).walk(|_| {
            calls += 1;
            Err(crate::error!(Config, "stop"))
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = tempdir().unwrap();
        let config = Config::new(temp.path().join("missing"), temp.path().join("out.md"));
        let err = scanner_for(config).collect_files().unwrap_err();
        assert!(matches!(err, DumpTextError::Walk { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_followed_by_default() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("root");
        let outside = temp.path().join("outside");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("secret.py"), "").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        let mut config = Config::new(&root, temp.path().join("out.md"));
        assert!(scanner_for(config.clone()).collect_files().unwrap().is_empty());

        config.follow_links = true;
        assert_eq!(
            scanner_for(config).collect_files().unwrap(),
            vec![root.join("link").join("secret.py")]
        );
    }
}
