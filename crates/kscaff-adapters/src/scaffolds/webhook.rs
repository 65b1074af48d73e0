//! `kscaff create webhook`: admission and conversion webhooks for a tracked kind.

use kscaff_core::{
    application::{ScaffoldService, Scaffolder},
    domain::{DomainError, FileBuilder, ProjectConfig, ResourceOptions, Universe},
    error::KscaffResult,
};
use tracing::info;

use super::load_boilerplate;
use crate::templates::{
    api::Webhook,
    config::{
        CrdKustomizationUpdater, DefaultKustomizeUpdater, EnableWebhookPatch,
        WebhookKustomization, WebhookKustomizeConfig, WebhookService,
    },
    project::MainUpdater,
};

/// Flags of `kscaff create webhook`.
#[derive(Debug, Clone)]
pub struct WebhookOptions {
    pub resource: ResourceOptions,
    pub defaulting: bool,
    pub validating: bool,
    pub conversion: bool,
}

#[derive(Debug)]
pub struct WebhookScaffolder {
    options: WebhookOptions,
}

impl WebhookScaffolder {
    pub fn new(options: WebhookOptions) -> Self {
        Self { options }
    }
}

impl Scaffolder for WebhookScaffolder {
    fn name(&self) -> &str {
        "create webhook"
    }

    fn validate(&self, config: &ProjectConfig) -> KscaffResult<()> {
        let options = &self.options;
        options.resource.validate()?;
        if !(options.defaulting || options.validating || options.conversion) {
            return Err(DomainError::NoWebhookSelected.into());
        }
        let gvk = options.resource.gvk();
        if !config.has_resource(&gvk) {
            return Err(DomainError::ResourceNotTracked {
                gvk: gvk.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn scaffold(&mut self, config: &mut ProjectConfig, engine: &ScaffoldService) -> KscaffResult<()> {
        let options = &self.options;
        let resource = options.resource.new_resource(config, true);
        let boilerplate = load_boilerplate(engine.filesystem())?;
        let universe = || {
            Universe::new(config.clone())
                .with_boilerplate(boilerplate.clone())
                .with_resource(resource.clone())
        };

        let mut files = vec![
            FileBuilder::template(Webhook::new(options.defaulting, options.validating)),
            FileBuilder::template(WebhookKustomization::default()),
            FileBuilder::template(WebhookService::default()),
            FileBuilder::template(WebhookKustomizeConfig::default()),
        ];
        if options.conversion {
            files.push(FileBuilder::template(EnableWebhookPatch::default()));
        }
        engine.execute(&mut universe(), files)?;

        let mut updates = vec![
            FileBuilder::inserter(MainUpdater {
                wire_webhook: true,
                ..MainUpdater::default()
            }),
            FileBuilder::inserter(DefaultKustomizeUpdater {
                webhook: true,
                ..DefaultKustomizeUpdater::default()
            }),
        ];
        if options.conversion {
            updates.push(FileBuilder::inserter(CrdKustomizationUpdater {
                conversion: true,
                ..CrdKustomizationUpdater::default()
            }));
            info!("Implement conversion.Hub and conversion.Convertible for your CRD types");
        }
        engine.execute(&mut universe(), updates)?;

        info!(gvk = %resource.gvk(), "Webhook scaffolded");
        Ok(())
    }
}
