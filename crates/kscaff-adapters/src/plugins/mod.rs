//! Post-render plugins selected by `--pattern`.

mod addon;

pub use addon::{AddonPlugin, DECLARATIVE_PATTERN_VERSION};

use kscaff_core::{application::Plugin, domain::DomainError};

use crate::renderer::TeraRenderer;

/// Patterns `create api --pattern` accepts.
pub const PATTERNS: &[&str] = &["addon"];

/// Plugins implementing `pattern`, an empty list for the default layout.
pub fn for_pattern(pattern: Option<&str>) -> Result<Vec<Box<dyn Plugin>>, DomainError> {
    match pattern.map(str::to_lowercase).as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some("addon") => Ok(vec![Box::new(AddonPlugin::new(TeraRenderer::new()))]),
        Some(other) => Err(DomainError::UnknownPattern {
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_names_are_case_insensitive() {
        assert!(for_pattern(None).unwrap().is_empty());
        assert_eq!(for_pattern(Some("Addon")).unwrap()[0].name(), "addon");
        assert_eq!(
            for_pattern(Some("helm")).err(),
            Some(DomainError::UnknownPattern {
                name: "helm".into()
            })
        );
    }
}
