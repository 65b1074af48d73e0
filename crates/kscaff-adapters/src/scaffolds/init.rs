//! `kscaff init`: a new project skeleton.

use std::path::Path;

use chrono::Datelike;
use kscaff_core::{
    application::{
        ApplicationError, FilesystemError, ScaffoldService, Scaffolder, ports::CommandRunner,
        ports::Filesystem,
    },
    domain::{DomainError, DomainValidator, FileBuilder, ProjectConfig, ProjectVersion, Universe},
    error::KscaffResult,
};
use tracing::{debug, info};

use crate::templates::{
    DEFAULT_BOILERPLATE_PATH,
    config::{
        DefaultKustomization, LeaderElectionRole, ManagerConfig, ManagerKustomization,
        RbacKustomization, RoleBinding,
    },
    hack::{Boilerplate, LICENSES},
    project::{DEFAULT_IMAGE, Dockerfile, GitIgnore, GoMod, Main, Makefile},
};

/// Flags of `kscaff init`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub domain: String,
    /// Go module path; read from `go.mod` when not given.
    pub repo: Option<String>,
    /// Defaults to the project directory name.
    pub project_name: Option<String>,
    pub license: String,
    pub owner: Option<String>,
    pub fetch_deps: bool,
    pub image: String,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            domain: "my.domain".into(),
            repo: None,
            project_name: None,
            license: "apache2".into(),
            owner: None,
            fetch_deps: true,
            image: DEFAULT_IMAGE.into(),
        }
    }
}

/// Module path declared by an existing `go.mod`, if any.
pub fn repo_from_go_mod(filesystem: &dyn Filesystem) -> KscaffResult<Option<String>> {
    let contents = match filesystem.read_to_string(Path::new("go.mod")) {
        Ok(contents) => contents,
        Err(FilesystemError::Open { .. }) => return Ok(None),
        Err(err) => return Err(ApplicationError::Filesystem(err).into()),
    };
    Ok(contents.lines().find_map(|line| {
        line.trim()
            .strip_prefix("module ")
            .map(|module| module.trim().trim_matches('"').to_string())
    }))
}

#[derive(Debug)]
pub struct InitScaffolder {
    options: InitOptions,
    repo: String,
    project_name: String,
    year: i32,
}

impl InitScaffolder {
    /// Fill the defaults `options` leaves open.
    ///
    /// `dir_name` is the name of the project directory.
    pub fn new(
        options: InitOptions,
        filesystem: &dyn Filesystem,
        dir_name: &str,
    ) -> KscaffResult<Self> {
        let repo = match &options.repo {
            Some(repo) => repo.clone(),
            None => repo_from_go_mod(filesystem)?.unwrap_or_default(),
        };
        let project_name = options
            .project_name
            .clone()
            .unwrap_or_else(|| dir_name.to_lowercase());
        Ok(Self {
            options,
            repo,
            project_name,
            year: chrono::Local::now().year(),
        })
    }

    /// Pin the copyright year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }
}

impl Scaffolder for InitScaffolder {
    fn name(&self) -> &str {
        "init"
    }

    fn validate(&self, _config: &ProjectConfig) -> KscaffResult<()> {
        DomainValidator::dns1123_subdomain(&self.options.domain).map_err(|reason| {
            DomainError::InvalidDomain {
                domain: self.options.domain.clone(),
                reason,
            }
        })?;
        if self.repo.is_empty() {
            return Err(DomainError::InvalidRepository {
                repo: self.repo.clone(),
                reason: "no --repo given and no module found in go.mod".into(),
            }
            .into());
        }
        DomainValidator::dns1123_label(&self.project_name).map_err(|reason| {
            DomainError::InvalidProjectName {
                name: self.project_name.clone(),
                reason,
            }
        })?;
        if !LICENSES.contains(&self.options.license.as_str()) {
            return Err(DomainError::UnknownLicense {
                name: self.options.license.clone(),
            }
            .into());
        }
        Ok(())
    }

    fn scaffold(&mut self, config: &mut ProjectConfig, engine: &ScaffoldService) -> KscaffResult<()> {
        config.domain = self.options.domain.clone();
        config.repo = self.repo.clone();
        if config.version != ProjectVersion::V2 {
            config.project_name = self.project_name.clone();
        }

        let mut universe = Universe::new(config.clone());
        engine.execute(
            &mut universe,
            vec![FileBuilder::template(Boilerplate::new(
                &self.options.license,
                self.options.owner.clone(),
                self.year,
            ))],
        )?;

        let boilerplate = engine
            .filesystem()
            .read_to_string(Path::new(DEFAULT_BOILERPLATE_PATH))?;
        debug!(bytes = boilerplate.len(), "Read back boilerplate");

        let mut universe =
            Universe::new(config.clone()).with_boilerplate(boilerplate.trim_end().to_string());
        engine.execute(
            &mut universe,
            vec![
                FileBuilder::template(GoMod::default()),
                FileBuilder::template(Makefile::new(&self.options.image)),
                FileBuilder::template(Dockerfile::default()),
                FileBuilder::template(GitIgnore::default()),
                FileBuilder::template(Main::default()),
                FileBuilder::template(DefaultKustomization::new(&self.project_name)),
                FileBuilder::template(ManagerConfig::new(&self.options.image)),
                FileBuilder::template(ManagerKustomization::default()),
                FileBuilder::template(RbacKustomization::default()),
                FileBuilder::template(RoleBinding::default()),
                FileBuilder::template(LeaderElectionRole::role()),
                FileBuilder::template(LeaderElectionRole::binding()),
            ],
        )?;

        info!(repo = %config.repo, domain = %config.domain, "Project initialized");
        Ok(())
    }

    fn post_scaffold(&self, _config: &ProjectConfig, runner: &dyn CommandRunner) -> KscaffResult<()> {
        if self.options.fetch_deps {
            runner.run("go", &["mod", "tidy"])?;
        }
        Ok(())
    }
}
