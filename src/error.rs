//! Error handling for dumptext
//!
//! Errors come in two tiers. [`DumpTextError`] aborts the whole run (missing
//! root, unwritable output). [`ReadFailure`] belongs to a single input file:
//! the file is skipped, a diagnostic is printed and the run carries on.

use std::io;
use std::string::FromUtf8Error;

use strum::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Fatal error type for dumptext operations
#[derive(Error, Debug)]
pub enum DumpTextError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// The scan root exists but cannot be listed
    #[error("Cannot read directory {path}: {source}")]
    UnreadableRoot {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The output file could not be created or truncated
    #[error("Cannot create output file {path}: {source}")]
    OutputCreate {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Writing a record to the output file failed
    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Walking the root directory itself failed
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

/// Specialized Result type for dumptext operations
pub type Result<T> = std::result::Result<T, DumpTextError>;

/// Creates a DumpTextError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DumpTextError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// main returns io::Result, so fatal errors must convert
impl From<DumpTextError> for io::Error {
    fn from(err: DumpTextError) -> Self {
        let kind = match &err {
            DumpTextError::PathNotFound(_) => io::ErrorKind::NotFound,
            DumpTextError::NotADirectory(_) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::Other,
        };
        match err {
            DumpTextError::Io(e) => e,
            other => io::Error::new(kind, other.to_string()),
        }
    }
}

/// Why a single input file was left out of the output
#[derive(Error, Debug)]
pub enum ReadFailure {
    /// Content is not valid UTF-8
    #[error("invalid UTF-8 data: {0}")]
    Decode(#[source] FromUtf8Error),

    /// The file (or a link target) is not readable by this user
    #[error("{0}")]
    PermissionDenied(#[source] io::Error),

    /// The file exceeds `--max-file-size`
    #[error("file too large ({size} bytes > {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// Any other I/O failure while opening or reading
    #[error("{0}")]
    Io(#[source] io::Error),
}

/// Coarse classification of a [`ReadFailure`], used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FailureKind {
    Decode,
    PermissionDenied,
    TooLarge,
    Io,
}

impl ReadFailure {
    /// The kind of failure, independent of its payload
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Decode(_) => FailureKind::Decode,
            Self::PermissionDenied(_) => FailureKind::PermissionDenied,
            Self::TooLarge { .. } => FailureKind::TooLarge,
            Self::Io(_) => FailureKind::Io,
        }
    }
}

impl From<io::Error> for ReadFailure {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(err),
            _ => Self::Io(err),
        }
    }
}

impl From<FromUtf8Error> for ReadFailure {
    fn from(err: FromUtf8Error) -> Self {
        Self::Decode(err)
    }
}
