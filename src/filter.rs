/*!
 * Folder and extension skip rules
 *
 * Folders are matched by exact name at any depth. Files are matched by the
 * lower-cased suffix of their name, taken from the last dot.
 */

use std::path::Path;

use tracing::debug;

use crate::config::Config;

/// Return the suffix of `file_name` starting at its last dot, or `""`.
///
/// Leading dots do not start a suffix, so `.gitignore` has none while
/// `archive.tar.gz` yields `.gz` and `name.` yields `.`.
pub fn file_extension(file_name: &str) -> &str {
    let Some(dot) = file_name.rfind('.') else {
        return "";
    };

    if file_name[..dot].chars().all(|c| c == '.') {
        return "";
    }

    &file_name[dot..]
}

/// Whether a skip-extensions entry can ever equal a value of [`file_extension`].
///
/// A suffix always starts with its only dot, so dotfile names such as
/// `.config.js` or entries like ` copy.js` are never produced. The empty
/// entry matches names without a suffix.
pub fn is_reachable_extension(entry: &str) -> bool {
    if entry.is_empty() {
        return true;
    }
    match entry.strip_prefix('.') {
        Some(rest) => !rest.contains('.'),
        None => false,
    }
}

/// Compiled skip rules for one run
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    folders: Vec<String>,
    extensions: Vec<String>,
}

impl SkipRules {
    /// Create rules from literal folder names and extension entries
    pub fn new<F, E>(folders: F, extensions: E) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
            extensions: extensions
                .into_iter()
                .map(|e| e.into().to_lowercase())
                .collect(),
        }
    }

    /// Build the rules carried by a [`Config`]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.skip_folders.iter().cloned(),
            config.skip_extensions.iter().cloned(),
        )
    }

    /// Check if a directory with this name must not be descended into
    pub fn should_skip_folder(&self, name: &str) -> bool {
        self.folders.iter().any(|f| f == name)
    }

    /// Check if a file with this name must not be read
    pub fn should_skip_file(&self, name: &str) -> bool {
        let extension = file_extension(name).to_lowercase();
        let skip = self.extensions.iter().any(|e| *e == extension);
        if skip {
            debug!(file = name, extension = %extension, "extension filtered");
        }
        skip
    }

    /// Check a path by its final component
    pub fn should_skip_path(&self, path: &Path, is_dir: bool) -> bool {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        if is_dir {
            self.should_skip_folder(&name)
        } else {
            self.should_skip_file(&name)
        }
    }

    /// Extension entries that no file name can ever match
    pub fn unreachable_extensions(&self) -> Vec<&str> {
        self.extensions
            .iter()
            .filter(|e| !is_reachable_extension(e))
            .map(String::as_str)
            .collect()
    }
}
