use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Port for file access inside the data directory.
///
/// Every path is relative to the data root; implementations reject paths
/// that would resolve outside it.
pub trait DataStore {
    /// Human-readable location of the data root, for messages.
    fn describe_root(&self) -> String;

    /// Read a UTF-8 file. A missing file is an `io::ErrorKind::NotFound` error.
    fn read_file(&self, path: &Path) -> Result<String, AppError>;

    /// Write a file, creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError>;

    /// Remove a file. A missing file is an `io::ErrorKind::NotFound` error.
    fn remove_file(&self, path: &Path) -> Result<(), AppError>;

    /// Remove a directory tree. A missing directory is not an error.
    fn remove_dir_all(&self, path: &Path) -> Result<(), AppError>;

    fn create_dir_all(&self, path: &Path) -> Result<(), AppError>;

    /// Regular files directly inside `dir`, as root-relative paths, sorted.
    /// A missing directory lists as empty.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError>;

    fn file_exists(&self, path: &Path) -> bool;
}
