//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kscaff-adapters` crate provides implementations.

use std::path::Path;

use crate::{
    application::error::FilesystemError,
    domain::{FuncMap, ProjectConfig},
    error::KscaffResult,
};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kscaff_adapters::filesystem::LocalFilesystem` (production)
/// - `kscaff_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are relative to the project root. Every method reports the failing
/// step through its own [`FilesystemError`] variant.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if a path exists. Failing to find out is an error, not `false`.
    fn exists(&self, path: &Path) -> Result<bool, FilesystemError>;

    /// Read a whole file.
    fn read_to_string(&self, path: &Path) -> Result<String, FilesystemError>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Create or truncate a file and write `contents` to it.
    fn write_file(&self, path: &Path, contents: &str) -> Result<(), FilesystemError>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `kscaff_adapters::renderer::TeraRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render `body` against `data`, exposing `funcs` to the template.
    ///
    /// `name` identifies the template in error messages.
    fn render(
        &self,
        name: &str,
        body: &str,
        data: &serde_json::Value,
        funcs: &FuncMap,
    ) -> KscaffResult<String>;
}

/// Port for the persisted project configuration.
///
/// Implemented by:
/// - `kscaff_adapters::config_store::YamlConfigStore`
pub trait ConfigStore: Send + Sync {
    fn exists(&self) -> KscaffResult<bool>;

    fn load(&self) -> KscaffResult<ProjectConfig>;

    fn save(&self, config: &ProjectConfig) -> KscaffResult<()>;
}

/// Port for running external commands after scaffolding.
///
/// Implemented by:
/// - `kscaff_adapters::process::ProcessRunner`
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in the project root, blocking until it exits.
    fn run(&self, program: &str, args: &[&str]) -> KscaffResult<()>;
}
