use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::AppError;
use crate::ports::DataStore;

/// In-memory data store for unit tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataStore {
    // Shared so clones observe each other's writes
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().unwrap().insert(PathBuf::from(path), content.to_string());
        self
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

fn normalize(path: &Path) -> Result<PathBuf, AppError> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return Err(AppError::PathTraversal(path.display().to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(AppError::PathTraversal(path.display().to_string()));
            }
        }
    }
    Ok(out)
}

fn not_found(path: &Path) -> AppError {
    AppError::Io(io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
}

impl DataStore for MemoryDataStore {
    fn describe_root(&self) -> String {
        "<memory>".to_string()
    }

    fn read_file(&self, path: &Path) -> Result<String, AppError> {
        let key = normalize(path)?;
        self.files.lock().unwrap().get(&key).cloned().ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        let key = normalize(path)?;
        self.files.lock().unwrap().insert(key, content.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), AppError> {
        let key = normalize(path)?;
        self.files.lock().unwrap().remove(&key).map(|_| ()).ok_or_else(|| not_found(path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), AppError> {
        let prefix = normalize(path)?;
        self.files.lock().unwrap().retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), AppError> {
        normalize(path).map(|_| ())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let dir = normalize(dir)?;
        let files = self.files.lock().unwrap();
        Ok(files.keys().filter(|key| key.parent() == Some(dir.as_path())).cloned().collect())
    }

    fn file_exists(&self, path: &Path) -> bool {
        match normalize(path) {
            Ok(key) => self.files.lock().unwrap().contains_key(&key),
            Err(_) => false,
        }
    }
}
