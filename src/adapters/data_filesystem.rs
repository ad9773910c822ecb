use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::domain::AppError;
use crate::ports::DataStore;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "VIBEPROMPT_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

/// Filesystem-backed data store rooted at the data directory.
#[derive(Debug, Clone)]
pub struct FilesystemDataStore {
    root: PathBuf,
}

impl FilesystemDataStore {
    /// Create a store for the given data directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the data directory: explicit path, then `VIBEPROMPT_DATA_DIR`,
    /// then `./data`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, AppError> {
        let root = match explicit {
            Some(path) => path,
            None => match std::env::var_os(DATA_DIR_ENV) {
                Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => std::env::current_dir()?.join(DEFAULT_DATA_DIR),
            },
        };
        debug!(root = %root.display(), "resolved data directory");
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a root-relative path, refusing anything that escapes the root.
    fn resolve_path(&self, path: &Path) -> Result<PathBuf, AppError> {
        if path.is_absolute() {
            return Err(AppError::PathTraversal(path.display().to_string()));
        }
        let full_path = self.root.join(path);
        if !normalize_path(&full_path).starts_with(normalize_path(&self.root)) {
            return Err(AppError::PathTraversal(path.display().to_string()));
        }
        Ok(full_path)
    }
}

impl DataStore for FilesystemDataStore {
    fn describe_root(&self) -> String {
        self.root.display().to_string()
    }

    fn read_file(&self, path: &Path) -> Result<String, AppError> {
        let full_path = self.resolve_path(path)?;
        fs::read_to_string(full_path).map_err(AppError::from)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        let full_path = self.resolve_path(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full_path, content).map_err(AppError::from)
    }

    fn remove_file(&self, path: &Path) -> Result<(), AppError> {
        let full_path = self.resolve_path(path)?;
        fs::remove_file(full_path).map_err(AppError::from)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), AppError> {
        let full_path = self.resolve_path(path)?;
        match fs::remove_dir_all(full_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), AppError> {
        let full_path = self.resolve_path(path)?;
        fs::create_dir_all(full_path).map_err(AppError::from)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let full_path = self.resolve_path(dir)?;
        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(dir.join(entry.file_name()));
            }
        }
        // sort for determinism
        files.sort();
        Ok(files)
    }

    fn file_exists(&self, path: &Path) -> bool {
        // a path outside the root never exists
        match self.resolve_path(path) {
            Ok(full_path) => full_path.is_file(),
            Err(_) => false,
        }
    }
}

/// Lexically fold `.` and `..` components without touching the disk.
fn normalize_path(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => ret.push(c),
        }
    }
    ret
}
