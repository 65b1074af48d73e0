//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use kscaff_core::application::{FilesystemError, ports::Filesystem};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while the engine owns
/// a boxed copy.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

fn poisoned() -> io::Error {
    io::Error::other("memory filesystem lock poisoned")
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_directories(parent);
            }
            inner.files.insert(path.to_path_buf(), contents.to_string());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// List all files in path order.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl MemoryFilesystemInner {
    fn add_directories(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> Result<bool, FilesystemError> {
        let inner = self.inner.read().map_err(|_| FilesystemError::Exists {
            path: path.to_path_buf(),
            cause: poisoned(),
        })?;
        Ok(inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FilesystemError> {
        let inner = self.inner.read().map_err(|_| FilesystemError::Read {
            path: path.to_path_buf(),
            cause: poisoned(),
        })?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FilesystemError::Open {
                path: path.to_path_buf(),
                cause: io::ErrorKind::NotFound.into(),
            })
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        let mut inner = self.inner.write().map_err(|_| FilesystemError::CreateDirectory {
            path: path.to_path_buf(),
            cause: poisoned(),
        })?;
        if inner.files.contains_key(path) {
            return Err(FilesystemError::CreateDirectory {
                path: path.to_path_buf(),
                cause: io::ErrorKind::AlreadyExists.into(),
            });
        }
        inner.add_directories(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), FilesystemError> {
        let mut inner = self.inner.write().map_err(|_| FilesystemError::Write {
            path: path.to_path_buf(),
            cause: poisoned(),
        })?;

        // Parent must exist, like a real filesystem
        let orphan = path
            .parent()
            .is_some_and(|parent| !parent.as_os_str().is_empty() && !inner.directories.contains(parent));
        if orphan {
            return Err(FilesystemError::CreateFile {
                path: path.to_path_buf(),
                cause: io::ErrorKind::NotFound.into(),
            });
        }

        inner.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
