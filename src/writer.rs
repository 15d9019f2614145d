/*!
 * Plain-text record writer for dumptext
 *
 * Every included file becomes one record:
 *
 * ```text
 * --- File: <path> ---
 * <content>
 *
 * ```
 */

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{DumpTextError, ReadFailure, Result};

/// Separator written after each record's content
pub const RECORD_SEPARATOR: &str = "\n\n";

/// Format the header line for a file, without its newline
pub fn format_header(path: &Path) -> String {
    format!("--- File: {} ---", path.display())
}

/// Read a whole file as UTF-8 text.
///
/// The content is returned byte for byte; line endings are not touched.
/// Nothing is returned for a file that fails part way.
pub fn read_text(path: &Path, max_size: Option<u64>) -> std::result::Result<String, ReadFailure> {
    if let Some(limit) = max_size {
        let size = fs::metadata(path)?.len();
        if size > limit {
            return Err(ReadFailure::TooLarge { size, limit });
        }
    }

    let bytes = fs::read(path)?;
    Ok(String::from_utf8(bytes)?)
}

/// Writer for the concatenated output
pub struct TextWriter<W: Write> {
    out: W,
    path: PathBuf,
    records: usize,
    bytes_written: u64,
}

impl TextWriter<BufWriter<File>> {
    /// Create or truncate the output file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| DumpTextError::OutputCreate {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> TextWriter<W> {
    /// Wrap an arbitrary sink; `path` is only used in error messages
    pub fn new(out: W, path: impl Into<PathBuf>) -> Self {
        Self {
            out,
            path: path.into(),
            records: 0,
            bytes_written: 0,
        }
    }

    /// Append one record
    pub fn write_record(&mut self, file_path: &Path, content: &str) -> Result<()> {
        let header = format_header(file_path);
        self.write_all(header.as_bytes())?;
        self.write_all(b"\n")?;
        self.write_all(content.as_bytes())?;
        self.write_all(RECORD_SEPARATOR.as_bytes())?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// Number of bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush buffered output and hand back the sink
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().map_err(|source| self.write_error(source))?;
        Ok(self.out)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.out
            .write_all(buf)
            .map_err(|source| self.write_error(source))?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    fn write_error(&self, source: io::Error) -> DumpTextError {
        DumpTextError::OutputWrite {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use tempfile::tempdir;

    #[test]
    fn test_record_format() {
        let mut writer = TextWriter::new(Vec::new(), "mem");
        writer
            .write_record(Path::new("backend/app.py"), "print(1)")
            .unwrap();
        writer
            .write_record(Path::new("backend/lib/util.py"), "x = 2\n")
            .unwrap();
        assert_eq!(writer.records(), 2);

        let bytes_written = writer.bytes_written();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "--- File: backend/app.py ---\nprint(1)\n\n--- File: backend/lib/util.py ---\nx = 2\n\n\n"
        );
        assert_eq!(bytes_written, out.len() as u64);
    }

    #[test]
    fn test_empty_file_record() {
        let mut writer = TextWriter::new(Vec::new(), "mem");
        writer.write_record(Path::new("empty.py"), "").unwrap();
        let out = writer.finish().unwrap();
        assert_eq!(out, b"--- File: empty.py ---\n\n\n");
    }

    #[test]
    fn test_read_text_keeps_bytes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("crlf.py");
        fs::write(&path, "a\r\nb\r\n\u{feff}c").unwrap();
        assert_eq!(read_text(&path, None).unwrap(), "a\r\nb\r\n\u{feff}c");
    }

    #[test]
    fn test_read_text_rejects_invalid_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blob.dat");
        fs::write(&path, [0x89, 0x50, 0x4e, 0x47, 0x00, 0xff]).unwrap();
        let failure = read_text(&path, None).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Decode);
    }

    #[test]
    fn test_read_text_size_cap() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("big.py");
        fs::write(&path, "0123456789").unwrap();

        let failure = read_text(&path, Some(4)).unwrap_err();
        assert!(matches!(
            failure,
            ReadFailure::TooLarge { size: 10, limit: 4 }
        ));
        assert_eq!(read_text(&path, Some(10)).unwrap(), "0123456789");
    }

    #[test]
    fn test_read_text_missing_file() {
        let temp = tempdir().unwrap();
        let failure = read_text(&temp.path().join("gone.py"), None).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Io);
    }

    #[test]
    fn test_create_truncates_existing_output() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out.txt");
        fs::write(&path, "stale content from a previous run").unwrap();

        let mut writer = TextWriter::create(&path).unwrap();
        writer.write_record(Path::new("a.py"), "1").unwrap();
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "--- File: a.py ---\n1\n\n");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp = tempdir().unwrap();
        let result = TextWriter::create(&temp.path().join("no").join("out.txt"));
        assert!(matches!(result, Err(DumpTextError::OutputCreate { .. })));
    }
}
