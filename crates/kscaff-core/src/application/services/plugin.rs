//! Post-render plugin pipeline.

use crate::{domain::Universe, error::KscaffResult};

/// A transformation applied to the rendered file set before it is written.
///
/// Plugins run in registration order, once per engine batch, and see the
/// changes made by earlier plugins. They may add, replace or remove entries
/// of [`Universe::files`] or fail the batch.
pub trait Plugin: Send + Sync {
    /// Identifier used in error messages.
    fn name(&self) -> &str;

    fn pipe(&self, universe: &mut Universe) -> KscaffResult<()>;
}
