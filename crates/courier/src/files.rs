//! File access for attachments.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// MIME type used when detection finds nothing.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A readable file resolved for attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: PathBuf,
    basename: String,
    mime_type: String,
    size: u64,
}

impl FileRef {
    /// Creates a file reference.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        basename: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            path: path.into(),
            basename: basename.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Path the file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used as the default attachment name.
    #[must_use]
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Detected MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size in bytes at the time the file was opened.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// Source of attachment files.
pub trait FileAccess {
    /// Resolves `path` to a readable file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn open(&self, path: &Path) -> io::Result<FileRef>;

    /// Reads the full content of a previously opened file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can no longer be read.
    fn read_all(&self, file: &FileRef) -> io::Result<Vec<u8>>;
}

/// Files on the local filesystem, typed with `mime_guess`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileAccess for LocalFiles {
    fn open(&self, path: &Path) -> io::Result<FileRef> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "path is a directory",
            ));
        }

        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(FileRef::new(
            path,
            basename,
            detect_mime_type(path),
            metadata.len(),
        ))
    }

    fn read_all(&self, file: &FileRef) -> io::Result<Vec<u8>> {
        fs::read(file.path())
    }
}

/// Detects the MIME type from a file extension.
#[must_use]
pub fn detect_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map_or_else(|| FALLBACK_MIME_TYPE.to_string(), |mime| mime.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type(Path::new("a.pdf")), "application/pdf");
        assert_eq!(detect_mime_type(Path::new("a.png")), "image/png");
        assert_eq!(detect_mime_type(Path::new("noext")), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_open_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"hello").unwrap();

        let file_ref = LocalFiles.open(&path).unwrap();
        assert_eq!(file_ref.basename(), "notes.txt");
        assert_eq!(file_ref.mime_type(), "text/plain");
        assert_eq!(file_ref.size(), 5);
        assert_eq!(LocalFiles.read_all(&file_ref).unwrap(), b"hello");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFiles.open(&dir.path().join("missing.bin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_open_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalFiles.open(dir.path()).is_err());
    }
}
