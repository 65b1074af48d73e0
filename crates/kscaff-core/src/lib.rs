//! kscaff core - hexagonal scaffolding engine for Kubernetes controller projects.
//!
//! This crate provides the domain and application layers of the kscaff
//! tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            kscaff-cli (CLI)             │
//! │     (builds scaffolders, maps errors)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (CommandService, ScaffoldService)     │
//! │   lifecycle, render, plugins, write     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ Filesystem, TemplateRenderer,           │
//! │ ConfigStore, CommandRunner              │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kscaff-adapters (Infrastructure)    │
//! │ LocalFilesystem, TeraRenderer, ...      │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ Resource, ProjectConfig, Marker,        │
//! │ Universe, templates, Go formatting      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kscaff_core::prelude::*;
//!
//! # fn demo(fs: Box<dyn Filesystem>, renderer: Box<dyn TemplateRenderer>, builders: Vec<FileBuilder>) -> KscaffResult<()> {
//! let engine = ScaffoldService::new(fs, renderer);
//! let mut universe = Universe::new(ProjectConfig::new(ProjectVersion::V2));
//! engine.execute(&mut universe, builders)?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        CommandService, Outcome, Plugin, ScaffoldService, Scaffolder,
        ports::{CommandRunner, ConfigStore, Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        Builder, Capability, FileBuilder, FileModel, GroupVersionKind, IfExistsAction, Inserter,
        Marker, ProjectConfig, ProjectVersion, Resource, ResourceOptions, Template, TemplateBody,
        TemplateContext, TemplateSpec, Universe,
    };
    pub use crate::error::{KscaffError, KscaffResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
