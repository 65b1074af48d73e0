//! `kscaff create api`: types, CRD manifests and a controller for one kind.

use kscaff_core::{
    application::{ScaffoldService, Scaffolder, ports::CommandRunner},
    domain::{DomainError, FileBuilder, ProjectConfig, Resource, ResourceOptions, Universe},
    error::KscaffResult,
};
use tracing::info;

use super::load_boilerplate;
use crate::{
    plugins::{self, DECLARATIVE_PATTERN_VERSION},
    templates::{
        api::{CrdSample, Group, Types},
        config::{
            CrdKustomization, CrdKustomizationUpdater, CrdKustomizeConfig, CrdRole,
            DefaultKustomizeUpdater,
        },
        controllers::{Controller, SuiteTest, SuiteTestUpdater},
        project::MainUpdater,
    },
};

/// Flags of `kscaff create api`.
#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub resource: ResourceOptions,
    pub do_resource: bool,
    pub do_controller: bool,
    pub force: bool,
    pub pattern: Option<String>,
    pub run_make: bool,
}

impl ApiOptions {
    pub fn new(resource: ResourceOptions) -> Self {
        Self {
            resource,
            do_resource: true,
            do_controller: true,
            force: false,
            pattern: None,
            run_make: true,
        }
    }
}

#[derive(Debug)]
pub struct ApiScaffolder {
    options: ApiOptions,
}

impl ApiScaffolder {
    pub fn new(options: ApiOptions) -> Self {
        Self { options }
    }

    fn universe(&self, config: &ProjectConfig, boilerplate: &str, resource: &Resource) -> Universe {
        Universe::new(config.clone())
            .with_boilerplate(boilerplate)
            .with_resource(resource.clone())
    }

    fn is_addon(&self) -> bool {
        self.options
            .pattern
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("addon"))
    }
}

impl Scaffolder for ApiScaffolder {
    fn name(&self) -> &str {
        "create api"
    }

    fn validate(&self, config: &ProjectConfig) -> KscaffResult<()> {
        let options = &self.options;
        options.resource.validate()?;
        if !options.do_resource && !options.do_controller {
            return Err(DomainError::NothingToScaffold.into());
        }
        plugins::for_pattern(options.pattern.as_deref())?;
        if options.do_resource {
            config.check_new_resource(&options.resource.gvk(), options.force)?;
        }
        Ok(())
    }

    fn scaffold(&mut self, config: &mut ProjectConfig, engine: &ScaffoldService) -> KscaffResult<()> {
        let options = &self.options;
        let resource = options.resource.new_resource(config, options.do_resource);
        if options.do_resource {
            config.update_resource(resource.gvk());
        }
        let boilerplate = load_boilerplate(engine.filesystem())?;

        if options.do_resource {
            engine.execute(
                &mut self.universe(config, &boilerplate, &resource),
                vec![
                    FileBuilder::template(Types::new(options.force)),
                    FileBuilder::template(Group::default()),
                    FileBuilder::template(CrdSample::new(options.force)),
                    FileBuilder::template(CrdRole::editor()),
                    FileBuilder::template(CrdRole::viewer()),
                ],
            )?;
            engine.execute(
                &mut self.universe(config, &boilerplate, &resource),
                vec![
                    FileBuilder::template(CrdKustomization::new()),
                    FileBuilder::inserter(CrdKustomizationUpdater {
                        resource: true,
                        ..CrdKustomizationUpdater::default()
                    }),
                    FileBuilder::template(CrdKustomizeConfig::default()),
                ],
            )?;
        }

        if options.do_controller {
            engine.execute(
                &mut self.universe(config, &boilerplate, &resource),
                vec![
                    FileBuilder::template(SuiteTest::new()),
                    FileBuilder::inserter(SuiteTestUpdater {
                        wire_resource: options.do_resource,
                        ..SuiteTestUpdater::default()
                    }),
                    FileBuilder::template(Controller::new(options.force)),
                ],
            )?;
        }

        engine.execute(
            &mut self.universe(config, &boilerplate, &resource),
            vec![
                FileBuilder::inserter(MainUpdater {
                    wire_resource: options.do_resource,
                    wire_controller: options.do_controller,
                    ..MainUpdater::default()
                }),
                FileBuilder::inserter(DefaultKustomizeUpdater {
                    crd: options.do_resource,
                    rbac: true,
                    ..DefaultKustomizeUpdater::default()
                }),
            ],
        )?;

        info!(gvk = %resource.gvk(), "API scaffolded");
        Ok(())
    }

    fn post_scaffold(&self, _config: &ProjectConfig, runner: &dyn CommandRunner) -> KscaffResult<()> {
        if self.is_addon() {
            let module = format!("sigs.k8s.io/kubebuilder-declarative-pattern@{DECLARATIVE_PATTERN_VERSION}");
            runner.run("go", &["get", &module])?;
        }
        if self.options.run_make {
            runner.run("go", &["mod", "tidy"])?;
            runner.run("make", &["generate"])?;
        }
        Ok(())
    }
}
