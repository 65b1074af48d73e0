//! Infrastructure adapters for kscaff.
//!
//! This crate implements the ports defined in `kscaff-core::application::ports`
//! and holds everything that knows about Kubernetes controller projects:
//! the Go/YAML template set, one scaffolder per subcommand and the
//! `--pattern` plugins. All I/O lives here.

pub mod config_store;
pub mod filesystem;
pub mod plugins;
pub mod process;
pub mod renderer;
pub mod scaffolds;
pub mod templates;

// Re-export commonly used adapters
pub use config_store::{PROJECT_FILE, YamlConfigStore};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::ProcessRunner;
pub use renderer::TeraRenderer;
