//! `kscaff edit`: change project-wide settings after `init`.

use std::path::Path;

use kscaff_core::{
    application::{ScaffoldService, Scaffolder},
    domain::{FileBuilder, ProjectConfig, Universe},
    error::KscaffResult,
};
use tracing::{info, warn};

use crate::templates::project::{DOCKERFILE_PATH, DockerfileLayout};

#[derive(Debug)]
pub struct EditScaffolder {
    multigroup: bool,
}

impl EditScaffolder {
    pub fn new(multigroup: bool) -> Self {
        Self { multigroup }
    }
}

impl Scaffolder for EditScaffolder {
    fn name(&self) -> &str {
        "edit"
    }

    fn validate(&self, _config: &ProjectConfig) -> KscaffResult<()> {
        Ok(())
    }

    fn scaffold(&mut self, config: &mut ProjectConfig, engine: &ScaffoldService) -> KscaffResult<()> {
        config.multigroup = self.multigroup;

        let dockerfile = Path::new(DOCKERFILE_PATH);
        if !engine.filesystem().exists(dockerfile)? {
            warn!(path = DOCKERFILE_PATH, "No Dockerfile to update");
            return Ok(());
        }
        let current = engine.filesystem().read_to_string(dockerfile)?;
        engine.execute(
            &mut Universe::new(config.clone()),
            vec![FileBuilder::template(DockerfileLayout::new(&current, self.multigroup))],
        )?;

        info!(multigroup = self.multigroup, "Project layout updated");
        Ok(())
    }
}
