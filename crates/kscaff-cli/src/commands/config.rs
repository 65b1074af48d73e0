//! `kscaff config`: inspect and create the user configuration file.

use std::path::PathBuf;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `file` is the `--config` override, which `path` and `init` honour too.
pub fn execute(
    cmd: ConfigCommands,
    file: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = file.unwrap_or_else(AppConfig::config_path);
    match cmd {
        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
        }

        ConfigCommands::Show => {
            let serialised = config.to_toml().map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.header("Current Configuration:")?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                output.warning(&format!(
                    "Config already exists at {}  (use --force to overwrite)",
                    path.display(),
                ))?;
                return Ok(());
            }
            AppConfig::default()
                .write_to(&path)
                .map_err(|e| CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: None,
                })?;
            output.success(&format!("Configuration created at {}", path.display()))?;
        }
    }

    Ok(())
}
