// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for kscaff.
//!
//! Pure logic only: resources, project configuration, markers, template
//! descriptors, the universe and Go source normalization. All I/O and
//! template rendering go through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Serde only for data**: render data and the PROJECT model derive serde
//!

pub mod config;
pub mod error;
pub mod format;
pub mod marker;
pub mod naming;
pub mod resource;
pub mod template;
pub mod universe;

mod validation;

pub use config::{ProjectConfig, ProjectVersion};
pub use error::{DomainError, ErrorCategory};
pub use format::{FormatError, format_go_source};
pub use marker::{CodeFragmentsMap, Marker, filter_existing, insert_fragments};
pub use resource::{GroupVersionKind, Resource, ResourceOptions};
pub use template::{
    Builder, Capability, FileBuilder, FileModel, FuncMap, IfExistsAction, Inserter, RenderData,
    Template, TemplateBody, TemplateContext, TemplateFn, TemplateSpec, default_funcs,
};
pub use universe::Universe;
pub use validation::DomainValidator;
