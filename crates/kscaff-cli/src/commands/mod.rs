//! Command handlers.
//!
//! Each handler turns parsed arguments into a scaffolder from
//! `kscaff-adapters`, runs it through a [`CommandService`] rooted at the
//! working directory and reports the outcome.

pub mod api;
pub mod completion;
pub mod config;
pub mod edit;
pub mod init;
pub mod update;
pub mod version;
pub mod webhook;

use std::path::{Path, PathBuf};

use kscaff_adapters::{LocalFilesystem, ProcessRunner, TeraRenderer, YamlConfigStore, plugins};
use kscaff_core::{
    application::{CommandService, Outcome, Plugin as _, ScaffoldService},
    domain::ResourceOptions,
    error::{KscaffError, KscaffResult},
};
use tracing::debug;

use crate::{
    cli::ResourceArgs,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// The project root: always the working directory.
fn project_dir() -> CliResult<PathBuf> {
    std::env::current_dir().with_cli_context(|| "failed to read the working directory")
}

/// Wire the local adapters around `dir`, with the plugins of `pattern`.
fn command_service(dir: &Path, pattern: Option<&str>) -> CliResult<CommandService> {
    let mut engine = ScaffoldService::new(
        Box::new(LocalFilesystem::at(dir)),
        Box::new(TeraRenderer::new()),
    );
    for plugin in plugins::for_pattern(pattern).map_err(KscaffError::from)? {
        debug!(plugin = plugin.name(), "Plugin enabled");
        engine = engine.with_plugin(plugin);
    }
    Ok(CommandService::new(
        Box::new(YamlConfigStore::new(Box::new(LocalFilesystem::at(dir)))),
        Box::new(ProcessRunner::new(dir)),
        engine,
    ))
}

/// Run `f` behind a spinner.
fn with_spinner<F>(output: &OutputManager, msg: &str, f: F) -> CliResult<Outcome>
where
    F: FnOnce() -> KscaffResult<Outcome>,
{
    let spinner = output.spinner(msg);
    let result = f();
    spinner.finish_and_clear();
    Ok(result?)
}

/// Surface a failed post-scaffold step as a warning; the files are written.
fn report(outcome: &Outcome, output: &OutputManager) -> CliResult<()> {
    if let Some(err) = &outcome.post_scaffold_error {
        output.warning(&err.to_string())?;
        for suggestion in err.suggestions() {
            output.print(&format!("  {suggestion}"))?;
        }
    }
    Ok(())
}

impl From<ResourceArgs> for ResourceOptions {
    fn from(args: ResourceArgs) -> Self {
        let options = ResourceOptions::new(args.group, args.version, args.kind)
            .with_namespaced(args.namespaced);
        match args.plural {
            Some(plural) => options.with_plural(plural),
            None => options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_args_carry_plural_and_scope() {
        let options = ResourceOptions::from(ResourceArgs {
            group: "ship".into(),
            version: "v1beta1".into(),
            kind: "Frigate".into(),
            plural: Some("frigatez".into()),
            namespaced: false,
        });
        assert_eq!(
            options,
            ResourceOptions::new("ship", "v1beta1", "Frigate")
                .with_plural("frigatez")
                .with_namespaced(false)
        );
    }

    #[test]
    fn unknown_pattern_is_rejected_before_wiring() {
        let dir = tempfile::tempdir().unwrap();
        assert!(command_service(dir.path(), Some("helm")).is_err());
        assert!(command_service(dir.path(), Some("addon")).is_ok());
    }
}
