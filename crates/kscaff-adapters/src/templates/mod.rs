//! Go and YAML file templates for controller projects.
//!
//! Bodies use Tera syntax and see the builder's serialized fields: the
//! injected context (`domain`, `repo`, `multi_group`, `boilerplate`,
//! `resource`, ...) at the top level next to template-specific fields.

use kscaff_core::domain::{IfExistsAction, TemplateContext};

/// Implement `Builder` for a struct with a `ctx: TemplateContext` field.
macro_rules! builder {
    ($ty:ty, [$($cap:ident),* $(,)?]) => {
        impl ::kscaff_core::domain::Builder for $ty {
            fn context(&self) -> &::kscaff_core::domain::TemplateContext {
                &self.ctx
            }

            fn context_mut(&mut self) -> &mut ::kscaff_core::domain::TemplateContext {
                &mut self.ctx
            }

            fn capabilities(&self) -> &'static [::kscaff_core::domain::Capability] {
                &[$(::kscaff_core::domain::Capability::$cap),*]
            }
        }
    };
}

pub mod api;
pub mod config;
pub mod controllers;
pub mod hack;
pub mod project;

pub use hack::DEFAULT_BOILERPLATE_PATH;

/// Marker names shared between templates and their updaters.
pub mod markers {
    pub const IMPORTS: &str = "imports";
    pub const SCHEME: &str = "scheme";
    pub const BUILDER: &str = "builder";
    pub const BASES: &str = "bases";
    pub const CRD_RESOURCE: &str = "crdkustomizeresource";
    pub const CRD_WEBHOOK_PATCH: &str = "crdkustomizewebhookpatch";
}

fn multi_group(ctx: &TemplateContext) -> bool {
    ctx.multi_group.unwrap_or(false)
}

/// `force` turns a user-owned file into a regenerated one.
fn error_unless(force: bool) -> IfExistsAction {
    if force {
        IfExistsAction::Overwrite
    } else {
        IfExistsAction::Error
    }
}

/// API package directory, with placeholders.
fn api_dir(ctx: &TemplateContext) -> &'static str {
    if multi_group(ctx) {
        "apis/%[group]/%[version]"
    } else {
        "api/%[version]"
    }
}

/// Controller package directory, with placeholders.
fn controllers_dir(ctx: &TemplateContext) -> &'static str {
    if multi_group(ctx) {
        "controllers/%[group]"
    } else {
        "controllers"
    }
}
