//! `kscaff create api`: scaffold types, manifests and a controller.

use kscaff_adapters::scaffolds::{ApiOptions, ApiScaffolder};
use tracing::instrument;

use super::{command_service, project_dir, report, with_spinner};
use crate::{
    cli::ApiArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(kind = %args.resource.kind))]
pub fn execute(args: ApiArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let do_resource = resolve(args.do_resource, "Create Resource", &output)?;
    let do_controller = resolve(args.do_controller, "Create Controller", &output)?;
    check_selection(args.do_resource, args.do_controller, do_resource, do_controller)?;
    let options = ApiOptions {
        do_resource,
        do_controller,
        force: args.force,
        pattern: args.pattern,
        run_make: args.run_make.unwrap_or(config.scaffold.run_make),
        ..ApiOptions::new(args.resource.into())
    };
    let kind = options.resource.kind.clone();

    let dir = project_dir()?;
    let service = command_service(&dir, options.pattern.as_deref())?;
    let run_make = options.run_make;
    let mut scaffolder = ApiScaffolder::new(options);

    let spinner_msg = if run_make {
        "Writing scaffold and running make..."
    } else {
        "Writing scaffold..."
    };
    let outcome = with_spinner(&output, spinner_msg, || service.run(&mut scaffolder))?;
    report(&outcome, &output)?;

    output.success(&format!("API for {kind} scaffolded"))?;
    if !run_make {
        output.info("Run `make generate` to update generated code")?;
    }
    Ok(())
}

/// Declining every prompt leaves nothing to scaffold.
fn check_selection(
    resource_flag: Option<bool>,
    controller_flag: Option<bool>,
    do_resource: bool,
    do_controller: bool,
) -> CliResult<()> {
    let prompted = resource_flag.is_none() || controller_flag.is_none();
    if prompted && !do_resource && !do_controller {
        return Err(CliError::Cancelled);
    }
    Ok(())
}

/// An explicit flag wins; otherwise ask, or default to yes off a terminal.
fn resolve(flag: Option<bool>, prompt: &str, output: &OutputManager) -> CliResult<bool> {
    match flag {
        Some(value) => Ok(value),
        None if output.is_interactive() => confirm(prompt),
        None => Ok(true),
    }
}

#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact_opt()
        .map_err(|e| CliError::IoError {
            message: format!("failed to read answer to '{prompt}'"),
            source: e.into(),
        })?
        .ok_or(CliError::Cancelled)
}

#[cfg(not(feature = "interactive"))]
fn confirm(_prompt: &str) -> CliResult<bool> {
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{GlobalArgs, LogFormat};

    fn quiet_output() -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: None,
            log_file: None,
            log_format: LogFormat::Text,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn explicit_flags_skip_the_prompt() {
        let output = quiet_output();
        assert!(!resolve(Some(false), "Create Resource", &output).unwrap());
        assert!(resolve(Some(true), "Create Resource", &output).unwrap());
    }

    #[test]
    fn declining_both_prompts_cancels() {
        assert!(matches!(
            check_selection(None, Some(false), false, false),
            Err(CliError::Cancelled)
        ));
        assert!(check_selection(None, None, true, false).is_ok());
        assert!(check_selection(Some(false), Some(false), false, false).is_ok());
    }

    #[test]
    fn missing_flags_default_to_yes_without_a_terminal() {
        assert!(resolve(None, "Create Controller", &quiet_output()).unwrap());
    }
}
