//! `kscaff update`: refresh Go dependencies of an existing project.

use kscaff_core::{
    application::{ScaffoldService, Scaffolder, ports::CommandRunner},
    domain::ProjectConfig,
    error::KscaffResult,
};

#[derive(Debug, Default)]
pub struct UpdateScaffolder;

impl Scaffolder for UpdateScaffolder {
    fn name(&self) -> &str {
        "update"
    }

    fn validate(&self, _config: &ProjectConfig) -> KscaffResult<()> {
        Ok(())
    }

    fn scaffold(&mut self, _config: &mut ProjectConfig, _engine: &ScaffoldService) -> KscaffResult<()> {
        Ok(())
    }

    fn post_scaffold(&self, _config: &ProjectConfig, runner: &dyn CommandRunner) -> KscaffResult<()> {
        runner.run("go", &["mod", "tidy"])
    }
}
