//! PROJECT file persistence.

use std::path::Path;

use kscaff_core::{
    application::{
        ApplicationError,
        ports::{ConfigStore, Filesystem},
    },
    domain::ProjectConfig,
    error::KscaffResult,
};
use tracing::debug;

/// Name of the project configuration file at the project root.
pub const PROJECT_FILE: &str = "PROJECT";

/// Stores [`ProjectConfig`] as YAML in the `PROJECT` file.
///
/// The configuration is validated on load and on save, so a version 2 file
/// can never gain fields that version does not support.
pub struct YamlConfigStore {
    filesystem: Box<dyn Filesystem>,
}

impl YamlConfigStore {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }
}

impl ConfigStore for YamlConfigStore {
    fn exists(&self) -> KscaffResult<bool> {
        Ok(self.filesystem.exists(Path::new(PROJECT_FILE))?)
    }

    fn load(&self) -> KscaffResult<ProjectConfig> {
        let raw = self.filesystem.read_to_string(Path::new(PROJECT_FILE))?;
        let config: ProjectConfig =
            serde_yaml::from_str(&raw).map_err(|e| ApplicationError::ConfigStore {
                reason: format!("failed to parse {PROJECT_FILE}: {e}"),
            })?;
        config.validate()?;
        debug!(resources = config.resources.len(), "Loaded project configuration");
        Ok(config)
    }

    fn save(&self, config: &ProjectConfig) -> KscaffResult<()> {
        config.validate()?;
        let raw = serde_yaml::to_string(config).map_err(|e| ApplicationError::ConfigStore {
            reason: format!("failed to serialize {PROJECT_FILE}: {e}"),
        })?;
        self.filesystem.write_file(Path::new(PROJECT_FILE), &raw)?;
        debug!("Saved project configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kscaff_core::{
        domain::{DomainError, GroupVersionKind, ProjectVersion},
        error::KscaffError,
    };
    use serde_json::json;

    use super::*;
    use crate::filesystem::MemoryFilesystem;

    fn store() -> (YamlConfigStore, MemoryFilesystem) {
        let fs = MemoryFilesystem::new();
        (YamlConfigStore::new(Box::new(fs.clone())), fs)
    }

    #[test]
    fn round_trips_minimal_v2_project() {
        let (store, fs) = store();
        let mut config = ProjectConfig::new(ProjectVersion::V2);
        config.domain = "example.org".into();
        config.repo = "example.com/m".into();

        assert!(!store.exists().unwrap());
        store.save(&config).unwrap();

        let raw = fs.read_file(PROJECT_FILE).unwrap();
        assert!(raw.contains("domain: example.org\n"));
        assert!(!raw.contains("resources"));
        assert!(!raw.contains("multigroup"));
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn round_trips_version_only_project() {
        let (store, _) = store();
        let config = ProjectConfig::new(ProjectVersion::V2);

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn round_trips_resources_and_multigroup() {
        let (store, _) = store();
        let mut config = ProjectConfig::new(ProjectVersion::V2);
        config.domain = "example.org".into();
        config.repo = "example.com/m".into();
        config.multigroup = true;
        config.resources = vec![
            GroupVersionKind::new("ship", "v1beta1", "Frigate"),
            GroupVersionKind::new("ship", "v1", "Destroyer"),
            GroupVersionKind::new("sea-creatures", "v1", "Kraken"),
        ];

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn round_trips_v3_plugins_as_opaque_values() {
        let (store, _) = store();
        let mut config = ProjectConfig::new(ProjectVersion::V3Alpha);
        config.domain = "example.org".into();
        config.repo = "example.com/m".into();
        config.project_name = "fleet".into();
        config.layout = "go.kubebuilder.io/v3".into();
        config.component_config = true;
        config.plugins.insert(
            "declarative.go.kubebuilder.io/v1".into(),
            json!({ "resources": [{ "kind": "Frigate", "channels": ["stable"] }] }),
        );

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn v2_file_with_v3_fields_is_rejected_on_load() {
        let fs = MemoryFilesystem::new()
            .with_file(PROJECT_FILE, "version: \"2\"\ndomain: example.org\nprojectName: fleet\n");
        let store = YamlConfigStore::new(Box::new(fs));

        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            KscaffError::Domain(DomainError::UnsupportedField { field: "projectName", .. })
        ));
    }

    #[test]
    fn unknown_version_and_bad_yaml_fail_to_load() {
        let fs = MemoryFilesystem::new().with_file(PROJECT_FILE, "version: \"1\"\n");
        let err = YamlConfigStore::new(Box::new(fs)).load().unwrap_err();
        assert!(err.to_string().contains("failed to parse PROJECT"));

        let fs = MemoryFilesystem::new().with_file(PROJECT_FILE, "version: [\n");
        let err = YamlConfigStore::new(Box::new(fs)).load().unwrap_err();
        assert!(matches!(
            err,
            KscaffError::Application(ApplicationError::ConfigStore { .. })
        ));
    }
}
