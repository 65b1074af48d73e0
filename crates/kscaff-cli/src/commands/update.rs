//! `kscaff update`: refresh Go module dependencies.

use kscaff_adapters::scaffolds::UpdateScaffolder;

use super::{command_service, project_dir, report, with_spinner};
use crate::{error::CliResult, output::OutputManager};

pub fn execute(output: OutputManager) -> CliResult<()> {
    let dir = project_dir()?;
    let service = command_service(&dir, None)?;
    let mut scaffolder = UpdateScaffolder;
    let outcome = with_spinner(&output, "Running go mod tidy...", || service.run(&mut scaffolder))?;
    report(&outcome, &output)?;

    if outcome.post_scaffold_error.is_none() {
        output.success("Dependencies updated")?;
    }
    Ok(())
}
