//! One [`Scaffolder`](kscaff_core::application::Scaffolder) per subcommand.
//!
//! Each scaffolder validates its options against the PROJECT file, then
//! runs small ordered engine batches. A failed batch leaves the earlier
//! ones on disk.

mod api;
mod edit;
mod init;
mod update;
mod webhook;

pub use api::{ApiOptions, ApiScaffolder};
pub use edit::EditScaffolder;
pub use init::{InitOptions, InitScaffolder, repo_from_go_mod};
pub use update::UpdateScaffolder;
pub use webhook::{WebhookOptions, WebhookScaffolder};

use std::path::Path;

use kscaff_core::{
    application::{ApplicationError, FilesystemError, ports::Filesystem},
    error::KscaffResult,
};
use tracing::warn;

use crate::templates::DEFAULT_BOILERPLATE_PATH;

/// License header written by `init`, or empty when it is gone.
fn load_boilerplate(filesystem: &dyn Filesystem) -> KscaffResult<String> {
    match filesystem.read_to_string(Path::new(DEFAULT_BOILERPLATE_PATH)) {
        Ok(text) => Ok(text.trim_end().to_string()),
        Err(FilesystemError::Open { .. }) => {
            warn!(
                path = DEFAULT_BOILERPLATE_PATH,
                "Boilerplate not found, generated files will have no license header"
            );
            Ok(String::new())
        }
        Err(err) => Err(ApplicationError::Filesystem(err).into()),
    }
}
