//! `kscaff edit`: change project-wide settings.

use kscaff_adapters::scaffolds::EditScaffolder;

use super::{command_service, project_dir, report, with_spinner};
use crate::{cli::EditArgs, error::CliResult, output::OutputManager};

pub fn execute(args: EditArgs, output: OutputManager) -> CliResult<()> {
    let dir = project_dir()?;
    let service = command_service(&dir, None)?;
    let mut scaffolder = EditScaffolder::new(args.multigroup);
    let outcome = with_spinner(&output, "Updating project...", || service.run(&mut scaffolder))?;
    report(&outcome, &output)?;

    let layout = if outcome.config.multigroup {
        "multi-group"
    } else {
        "single-group"
    };
    output.success(&format!("Project switched to the {layout} layout"))?;
    Ok(())
}
