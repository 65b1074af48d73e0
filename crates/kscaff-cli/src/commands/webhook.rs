//! `kscaff create webhook`: scaffold admission and conversion webhooks.

use kscaff_adapters::scaffolds::{WebhookOptions, WebhookScaffolder};
use tracing::instrument;

use super::{command_service, project_dir, report, with_spinner};
use crate::{cli::WebhookArgs, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(kind = %args.resource.kind))]
pub fn execute(args: WebhookArgs, output: OutputManager) -> CliResult<()> {
    let options = WebhookOptions {
        resource: args.resource.into(),
        defaulting: args.defaulting,
        validating: args.validating,
        conversion: args.conversion,
    };
    let kind = options.resource.kind.clone();

    let dir = project_dir()?;
    let service = command_service(&dir, None)?;
    let mut scaffolder = WebhookScaffolder::new(options);
    let outcome = with_spinner(&output, "Writing scaffold...", || service.run(&mut scaffolder))?;
    report(&outcome, &output)?;

    output.success(&format!("Webhook for {kind} scaffolded"))?;
    Ok(())
}
