//! `kscaff version`.

use crate::{error::CliResult, output::OutputManager};

/// One line: tool version, then the engine version it was built against.
pub fn version_line() -> String {
    format!(
        "kscaff version: {} (engine {})",
        env!("CARGO_PKG_VERSION"),
        kscaff_core::VERSION
    )
}

pub fn execute(output: OutputManager) -> CliResult<()> {
    output.print(&version_line())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_names_the_package_version() {
        assert!(version_line().starts_with(&format!("kscaff version: {}", env!("CARGO_PKG_VERSION"))));
    }
}
