//! `kscaff init`: scaffold a new project in the working directory.

use kscaff_adapters::{
    LocalFilesystem,
    scaffolds::{InitOptions, InitScaffolder},
};
use kscaff_core::{
    domain::{ProjectConfig, ProjectVersion},
    error::KscaffError,
};
use tracing::{info, instrument};

use super::{command_service, project_dir, report, with_spinner};
use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Flags win over the user configuration.
fn init_options(args: InitArgs, config: AppConfig) -> InitOptions {
    let defaults = InitOptions::default();
    InitOptions {
        domain: args.domain.unwrap_or(config.defaults.domain),
        repo: args.repo,
        project_name: args.project_name,
        license: args.license.unwrap_or(config.defaults.license),
        owner: args.owner.or(config.defaults.owner),
        fetch_deps: args.fetch_deps,
        image: args.image.unwrap_or(defaults.image),
    }
}

#[instrument(skip_all)]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let dir = project_dir()?;
    let dir_name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("cannot derive a project name from '{}'", dir.display()),
            source: None,
        })?
        .to_string();
    let version: ProjectVersion = args
        .project_version
        .parse()
        .map_err(KscaffError::from)?;

    let options = init_options(args, config);
    let fetch_deps = options.fetch_deps;
    let mut scaffolder = InitScaffolder::new(options, &LocalFilesystem::at(&dir), &dir_name)?;
    let service = command_service(&dir, None)?;

    info!(dir = %dir.display(), version = %version, "Initializing project");
    let spinner_msg = if fetch_deps {
        "Writing scaffold and fetching dependencies..."
    } else {
        "Writing scaffold..."
    };
    let outcome = with_spinner(&output, spinner_msg, || {
        service.init(&mut scaffolder, ProjectConfig::new(version))
    })?;
    report(&outcome, &output)?;

    output.success(&format!("Project '{}' initialized", outcome.config.repo))?;
    if !fetch_deps {
        output.info("Run `go mod tidy` to fetch dependencies")?;
    }
    output.print("Next: define a resource with")?;
    output.print("  kscaff create api --group <group> --version <version> --kind <Kind>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn init_args(argv: &[&str]) -> InitArgs {
        let cli = Cli::parse_from(["kscaff", "init"].into_iter().chain(argv.iter().copied()));
        match cli.command {
            Commands::Init(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn config_fills_unset_flags() {
        let mut config = AppConfig::default();
        config.defaults.domain = "example.org".into();
        config.defaults.owner = Some("The Authors".into());

        let options = init_options(init_args(&["--repo", "example.com/m"]), config);
        assert_eq!(options.domain, "example.org");
        assert_eq!(options.owner.as_deref(), Some("The Authors"));
        assert_eq!(options.license, "apache2");
        assert_eq!(options.repo.as_deref(), Some("example.com/m"));
    }

    #[test]
    fn flags_win_over_config() {
        let mut config = AppConfig::default();
        config.defaults.domain = "example.org".into();

        let options = init_options(
            init_args(&["--domain", "example.com", "--license", "none", "--fetch-deps=false"]),
            config,
        );
        assert_eq!(options.domain, "example.com");
        assert_eq!(options.license, "none");
        assert!(!options.fetch_deps);
    }
}
