//! Per-run rendering context.

use std::collections::BTreeMap;

use crate::domain::{
    config::ProjectConfig,
    resource::Resource,
    template::{Builder, Capability, FileModel},
};

/// Shared context of one scaffolding run.
///
/// `files` is rebuilt by every engine batch and keyed by resolved path so
/// plugins can look files up and writes happen in a stable order.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    pub config: ProjectConfig,
    pub boilerplate: Option<String>,
    pub resource: Option<Resource>,
    pub files: BTreeMap<String, FileModel>,
}

impl Universe {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_boilerplate(mut self, boilerplate: impl Into<String>) -> Self {
        self.boilerplate = Some(boilerplate.into());
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Fill every declared, still unset capability field of `builder`.
    ///
    /// Values the scaffolder set explicitly are never replaced, which makes
    /// injection idempotent.
    pub fn inject<B: Builder + ?Sized>(&self, builder: &mut B) {
        let capabilities = builder.capabilities();
        let ctx = builder.context_mut();
        for capability in capabilities {
            match capability {
                Capability::Domain => {
                    ctx.domain.get_or_insert_with(|| self.config.domain.clone());
                }
                Capability::Repository => {
                    ctx.repo.get_or_insert_with(|| self.config.repo.clone());
                }
                Capability::MultiGroup => {
                    ctx.multi_group.get_or_insert(self.config.multigroup);
                }
                Capability::ProjectName => {
                    ctx.project_name
                        .get_or_insert_with(|| self.config.project_name.clone());
                }
                Capability::ComponentConfig => {
                    ctx.component_config.get_or_insert(self.config.component_config);
                }
                Capability::Boilerplate => {
                    if ctx.boilerplate.is_none() {
                        ctx.boilerplate = self.boilerplate.clone();
                    }
                }
                Capability::Resource => {
                    if ctx.resource.is_none() {
                        ctx.resource = self.resource.clone();
                    }
                }
            }
        }
    }
}
