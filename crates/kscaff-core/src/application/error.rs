//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{
    domain::{DomainError, FormatError},
    error::{ErrorCategory, KscaffError},
};

/// Filesystem failures, one variant per failing step.
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("failed to check if {} exists: {cause}", .path.display())]
    Exists { path: PathBuf, cause: io::Error },

    #[error("failed to open {}: {cause}", .path.display())]
    Open { path: PathBuf, cause: io::Error },

    #[error("failed to read {}: {cause}", .path.display())]
    Read { path: PathBuf, cause: io::Error },

    #[error("failed to create directory {}: {cause}", .path.display())]
    CreateDirectory { path: PathBuf, cause: io::Error },

    #[error("failed to create {}: {cause}", .path.display())]
    CreateFile { path: PathBuf, cause: io::Error },

    #[error("failed to write {}: {cause}", .path.display())]
    Write { path: PathBuf, cause: io::Error },

    #[error("failed to close {}: {cause}", .path.display())]
    Close { path: PathBuf, cause: io::Error },
}

impl FilesystemError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Exists { path, .. }
            | Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::CreateDirectory { path, .. }
            | Self::CreateFile { path, .. }
            | Self::Write { path, .. }
            | Self::Close { path, .. } => path,
        }
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// A builder rejected its injected context.
    #[error("invalid template for {path}: {cause}")]
    TemplateValidation { path: String, cause: DomainError },

    /// Template rendering failed.
    #[error("failed to render {path}: {reason}")]
    Render { path: String, reason: String },

    /// Go source normalization failed on rendered output.
    #[error("failed to format {path}: {cause}\nunformatted output:\n{raw}")]
    Format {
        path: String,
        cause: FormatError,
        raw: String,
    },

    /// Two templates of one batch target the same path.
    #[error("failed to create {path}: model already exists")]
    ModelAlreadyExists { path: String },

    /// Target file exists and its policy forbids touching it.
    #[error("failed to create {path}: file already exists")]
    FileAlreadyExists { path: String },

    /// A post-render plugin rejected or failed to transform the file set.
    #[error("plugin '{name}' failed: {cause}")]
    Plugin {
        name: String,
        cause: Box<KscaffError>,
    },

    /// PROJECT file could not be read or written.
    #[error("PROJECT file error: {reason}")]
    ConfigStore { reason: String },

    /// An external command run after scaffolding failed.
    #[error("post-scaffold command `{command}` failed: {reason}")]
    PostScaffold { command: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem(e) => vec![
                format!("Failed to access: {}", e.path().display()),
                "Check that you have write permissions".into(),
            ],
            Self::TemplateValidation { cause, .. } => cause.suggestions(),
            Self::FileAlreadyExists { path } => vec![
                format!("'{path}' was already scaffolded and may contain your changes"),
                "Use --force to overwrite it (destructive)".into(),
                "Or move the file away and run the command again".into(),
            ],
            Self::Format { .. } | Self::Render { .. } | Self::ModelAlreadyExists { .. } => vec![
                "This looks like a template bug, please report it".into(),
                "Re-run with -vv to see which file failed".into(),
            ],
            Self::Plugin { cause, .. } => cause.suggestions(),
            Self::ConfigStore { .. } => vec![
                "Check that the PROJECT file in the project root is valid YAML".into(),
            ],
            Self::PostScaffold { command, .. } => vec![
                "The scaffold itself was written successfully".into(),
                format!("Run `{command}` manually once the problem is fixed"),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Filesystem(_) => ErrorCategory::Internal,
            Self::TemplateValidation { cause, .. } => cause.category().into(),
            Self::FileAlreadyExists { .. } => ErrorCategory::Conflict,
            Self::Render { .. } | Self::Format { .. } | Self::ModelAlreadyExists { .. } => {
                ErrorCategory::Internal
            }
            Self::Plugin { cause, .. } => cause.category(),
            Self::ConfigStore { .. } => ErrorCategory::Configuration,
            Self::PostScaffold { .. } => ErrorCategory::Internal,
        }
    }
}
