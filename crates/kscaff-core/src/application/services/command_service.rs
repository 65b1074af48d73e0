//! Command lifecycle: Validate → Scaffold → Save → PostScaffold.
//!
//! Every CLI subcommand is a [`Scaffolder`]. The service loads the PROJECT
//! file, drives the scaffolder through its phases and persists the updated
//! configuration. Post-scaffold steps are best effort: their failure is
//! reported in the [`Outcome`] but never undoes the scaffold.

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{CommandRunner, ConfigStore},
        services::scaffold_service::ScaffoldService,
    },
    domain::{DomainError, ProjectConfig},
    error::{KscaffError, KscaffResult},
};

/// Driving port implemented by each subcommand.
pub trait Scaffolder {
    /// Subcommand name, used in logs.
    fn name(&self) -> &str;

    /// Check inputs against the loaded configuration. Must not write anything.
    fn validate(&self, config: &ProjectConfig) -> KscaffResult<()>;

    /// Update `config` and run one or more engine batches.
    fn scaffold(&mut self, config: &mut ProjectConfig, engine: &ScaffoldService) -> KscaffResult<()>;

    /// External commands to run once the files and PROJECT are written.
    fn post_scaffold(&self, _config: &ProjectConfig, _runner: &dyn CommandRunner) -> KscaffResult<()> {
        Ok(())
    }
}

/// Result of a completed command.
#[derive(Debug)]
pub struct Outcome {
    /// Configuration as saved to the PROJECT file.
    pub config: ProjectConfig,
    /// Set when a post-scaffold step failed.
    pub post_scaffold_error: Option<KscaffError>,
}

pub struct CommandService {
    store: Box<dyn ConfigStore>,
    runner: Box<dyn CommandRunner>,
    engine: ScaffoldService,
}

impl CommandService {
    pub fn new(
        store: Box<dyn ConfigStore>,
        runner: Box<dyn CommandRunner>,
        engine: ScaffoldService,
    ) -> Self {
        Self {
            store,
            runner,
            engine,
        }
    }

    /// Run a scaffolder against a project that does not exist yet.
    #[instrument(skip_all, fields(command = scaffolder.name()))]
    pub fn init(&self, scaffolder: &mut dyn Scaffolder, config: ProjectConfig) -> KscaffResult<Outcome> {
        if self.store.exists()? {
            return Err(DomainError::ProjectAlreadyInitialized.into());
        }
        self.drive(scaffolder, config)
    }

    /// Run a scaffolder against the existing PROJECT file.
    #[instrument(skip_all, fields(command = scaffolder.name()))]
    pub fn run(&self, scaffolder: &mut dyn Scaffolder) -> KscaffResult<Outcome> {
        if !self.store.exists()? {
            return Err(DomainError::ProjectNotInitialized.into());
        }
        let config = self.store.load()?;
        self.drive(scaffolder, config)
    }

    fn drive(&self, scaffolder: &mut dyn Scaffolder, mut config: ProjectConfig) -> KscaffResult<Outcome> {
        scaffolder.validate(&config)?;
        scaffolder.scaffold(&mut config, &self.engine)?;
        self.store.save(&config)?;
        info!(command = scaffolder.name(), "Scaffold complete");

        let post_scaffold_error = scaffolder
            .post_scaffold(&config, self.runner.as_ref())
            .inspect_err(|err| warn!(error = %err, "Post-scaffold step failed"))
            .err();

        Ok(Outcome {
            config,
            post_scaffold_error,
        })
    }
}
