//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "render a batch" or "run a subcommand".

pub mod command_service;
pub mod plugin;
pub mod scaffold_service;

pub use command_service::{CommandService, Outcome, Scaffolder};
pub use plugin::Plugin;
pub use scaffold_service::ScaffoldService;
