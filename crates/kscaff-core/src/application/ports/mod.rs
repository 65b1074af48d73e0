//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kscaff-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Template rendering
//!   - `ConfigStore`: PROJECT file persistence
//!   - `CommandRunner`: Post-scaffold external commands
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `Scaffolder` (see `services::command_service`)

pub mod output;

pub use output::{CommandRunner, ConfigStore, Filesystem, TemplateRenderer};

#[cfg(test)]
pub use output::MockFilesystem;
