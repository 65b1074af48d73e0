//! Local filesystem adapter using std::fs.

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use kscaff_core::application::{FilesystemError, ports::Filesystem};

/// Production filesystem implementation using `std::fs`.
///
/// Relative paths are resolved against `root`, the project directory.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Filesystem rooted at the current working directory.
    pub fn new() -> Self {
        Self::at(".")
    }

    /// Filesystem rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> Result<bool, FilesystemError> {
        fs::exists(self.resolve(path)).map_err(|cause| FilesystemError::Exists {
            path: path.to_path_buf(),
            cause,
        })
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FilesystemError> {
        let mut file = File::open(self.resolve(path)).map_err(|cause| FilesystemError::Open {
            path: path.to_path_buf(),
            cause,
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|cause| FilesystemError::Read {
                path: path.to_path_buf(),
                cause,
            })?;
        Ok(contents)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        fs::create_dir_all(self.resolve(path)).map_err(|cause| FilesystemError::CreateDirectory {
            path: path.to_path_buf(),
            cause,
        })
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), FilesystemError> {
        let mut file = File::create(self.resolve(path)).map_err(|cause| FilesystemError::CreateFile {
            path: path.to_path_buf(),
            cause,
        })?;
        file.write_all(contents.as_bytes())
            .map_err(|cause| FilesystemError::Write {
                path: path.to_path_buf(),
                cause,
            })?;
        file.sync_all().map_err(|cause| FilesystemError::Close {
            path: path.to_path_buf(),
            cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_reads_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::at(dir.path());
        let path = Path::new("config/rbac/role.yaml");

        assert!(!fs.exists(path).unwrap());
        fs.create_dir_all(path.parent().unwrap()).unwrap();
        fs.write_file(path, "first version, longer\n").unwrap();
        fs.write_file(path, "second\n").unwrap();

        assert!(fs.exists(path).unwrap());
        assert_eq!(fs.read_to_string(path).unwrap(), "second\n");
        assert!(dir.path().join("config/rbac/role.yaml").is_file());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::at(dir.path());

        let err = fs.read_to_string(Path::new("main.go")).unwrap_err();
        assert!(matches!(err, FilesystemError::Open { .. }));
        assert_eq!(err.path(), Path::new("main.go"));
    }

    #[test]
    fn create_fails_without_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::at(dir.path());

        let err = fs.write_file(Path::new("missing/x.yaml"), "x").unwrap_err();
        assert!(matches!(err, FilesystemError::CreateFile { .. }));
    }

    #[test]
    fn directory_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::at(dir.path());
        fs.write_file(Path::new("config"), "not a dir").unwrap();

        let err = fs.create_dir_all(Path::new("config/crd")).unwrap_err();
        assert!(matches!(err, FilesystemError::CreateDirectory { .. }));
    }
}
