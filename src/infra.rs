//! Infrastructure traits for abstracting I/O operations.
//!
//! The scanner, rewriter, backup manager and stylesheet injector all read and
//! write build artifacts through [`FileSystem`], so tests can substitute a
//! failing or in-memory implementation.

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Trait for abstracting filesystem operations.
///
/// This trait allows for dependency injection of filesystem operations,
/// making code more testable and allowing for alternative implementations
/// (e.g., in-memory filesystems for testing).
pub trait FileSystem {
    /// Copy a file from one location to another.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Get metadata for a file or directory.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a slice of bytes to a file.
    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()>;

    /// Whether a path exists.
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}

/// Real filesystem implementation that delegates to std::fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        std::fs::metadata(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

impl<T: FileSystem> FileSystem for &T {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        (**self).copy(from, to)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        (**self).metadata(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_real_filesystem_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("index.html");

        let fs = RealFileSystem;
        fs.write(&file_path, b"<div class=\"flex\"></div>").unwrap();

        let read_content = fs.read_to_string(&file_path).unwrap();
        assert_eq!(read_content, "<div class=\"flex\"></div>");
    }

    #[test]
    fn test_real_filesystem_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("app.js");
        let dest = temp_dir.path().join("app.js.bak");

        let fs = RealFileSystem;
        fs.write(&source, b"test content").unwrap();

        let bytes_copied = fs.copy(&source, &dest).unwrap();
        assert_eq!(bytes_copied, 12);
        assert_eq!(fs.read_to_string(&dest).unwrap(), "test content");
    }

    #[test]
    fn test_real_filesystem_exists_and_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("site.css");
        let fs = RealFileSystem;

        assert!(!fs.exists(&file_path));
        fs.write(&file_path, b"content").unwrap();
        assert!(fs.exists(&file_path));
        assert_eq!(fs.metadata(&file_path).unwrap().len(), 7);
    }

    #[test]
    fn test_real_filesystem_read_nonexistent_file_returns_error() {
        let fs = RealFileSystem;
        let result = fs.read_to_string(Path::new("/nonexistent/file.html"));
        assert!(result.is_err());
    }
}
