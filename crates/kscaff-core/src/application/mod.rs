//! Application layer for kscaff.
//!
//! This layer contains:
//! - **Services**: the rendering engine, plugin pipeline and command lifecycle
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{CommandService, Outcome, Plugin, ScaffoldService, Scaffolder};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, ConfigStore, Filesystem, TemplateRenderer};

pub use error::{ApplicationError, FilesystemError};
