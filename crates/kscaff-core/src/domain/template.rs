//! File builders: whole-file templates and marker-based inserters.
//!
//! Every builder embeds a [`TemplateContext`] by value and declares which
//! [`Capability`] fields it wants the universe to fill in. Templates render a
//! complete file; inserters splice code fragments into an existing one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    marker::{CodeFragmentsMap, Marker},
    naming,
    resource::Resource,
};

/// What to do when the target path already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum IfExistsAction {
    /// Leave the existing file alone.
    Skip,
    /// Fail the run, the file belongs to the user.
    #[default]
    Error,
    /// Replace the file, it is machine owned.
    Overwrite,
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileModel {
    pub path: String,
    pub contents: String,
    pub if_exists: IfExistsAction,
}

/// Context fields a builder can ask the universe to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Domain,
    Repository,
    MultiGroup,
    Boilerplate,
    Resource,
    ProjectName,
    ComponentConfig,
}

/// Shared, injectable render data embedded in every builder.
///
/// Unset fields are left out of the render data entirely, so a template
/// referencing data it never received fails to render instead of printing
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_group: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boilerplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_config: Option<bool>,
}

impl TemplateContext {
    /// Check that the fields behind `capabilities` were provided.
    pub fn require(&self, path: &str, capabilities: &[Capability]) -> Result<(), DomainError> {
        for capability in capabilities {
            let missing = match capability {
                Capability::Domain => self.domain.is_none().then_some("domain"),
                Capability::Repository => self
                    .repo
                    .as_deref()
                    .is_none_or(str::is_empty)
                    .then_some("repository"),
                Capability::Resource => self.resource.is_none().then_some("resource"),
                Capability::MultiGroup
                | Capability::Boilerplate
                | Capability::ProjectName
                | Capability::ComponentConfig => None,
            };
            if let Some(field) = missing {
                return Err(DomainError::MissingTemplateData {
                    path: path.to_string(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Text function exposed to template bodies as a filter.
pub type TemplateFn = fn(&str) -> String;

/// Named template functions.
pub type FuncMap = BTreeMap<&'static str, TemplateFn>;

/// Functions available to every template: `lower` and `title`.
pub fn default_funcs() -> FuncMap {
    let mut funcs = FuncMap::new();
    funcs.insert("lower", naming::lower as TemplateFn);
    funcs.insert("title", naming::title as TemplateFn);
    funcs
}

/// Body of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateBody {
    /// Written as-is, never passed to the renderer.
    Literal(String),
    /// Rendered with the builder as data.
    Parameterized(&'static str),
}

/// Path, body and conflict policy of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Target path relative to the project root, may contain `%[...]` tokens.
    pub path: String,
    pub body: TemplateBody,
    pub if_exists: IfExistsAction,
}

/// Common surface of templates and inserters.
pub trait Builder {
    fn context(&self) -> &TemplateContext;

    fn context_mut(&mut self) -> &mut TemplateContext;

    /// Fields this builder wants injected.
    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    /// Called after injection, before rendering. `path` is already resolved.
    fn validate(&self, path: &str) -> Result<(), DomainError> {
        self.context().require(path, self.capabilities())
    }
}

/// Serialized view of a builder handed to the renderer.
pub trait RenderData {
    fn render_data(&self) -> Result<serde_json::Value, serde_json::Error>;
}

impl<T: Serialize> RenderData for T {
    fn render_data(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A builder that renders a whole file.
pub trait Template: Builder + RenderData {
    fn spec(&self) -> TemplateSpec;

    /// Fill derived fields once the context is injected.
    fn set_defaults(&mut self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Extra functions on top of [`default_funcs`].
    fn funcs(&self) -> FuncMap {
        FuncMap::new()
    }
}

/// A builder that adds code fragments at markers of an existing file.
///
/// The merged result is always written with [`IfExistsAction::Overwrite`].
pub trait Inserter: Builder {
    /// Target path, may contain `%[...]` tokens.
    fn path(&self) -> String;

    fn markers(&self) -> Vec<Marker>;

    fn code_fragments(&self) -> CodeFragmentsMap;
}

/// One entry of an engine batch.
pub enum FileBuilder {
    Template(Box<dyn Template>),
    Inserter(Box<dyn Inserter>),
}

impl FileBuilder {
    pub fn template(template: impl Template + 'static) -> Self {
        Self::Template(Box::new(template))
    }

    pub fn inserter(inserter: impl Inserter + 'static) -> Self {
        Self::Inserter(Box::new(inserter))
    }
}

impl std::fmt::Debug for FileBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template(t) => f.debug_tuple("Template").field(&t.spec().path).finish(),
            Self::Inserter(i) => f.debug_tuple("Inserter").field(&i.path()).finish(),
        }
    }
}
