//! Persisted project state (the PROJECT file model).

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, resource::GroupVersionKind};

/// Format epoch of the PROJECT file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectVersion {
    #[default]
    V2,
    V3Alpha,
}

impl ProjectVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "2",
            Self::V3Alpha => "3-alpha",
        }
    }
}

impl fmt::Display for ProjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(Self::V2),
            "3-alpha" => Ok(Self::V3Alpha),
            other => Err(DomainError::UnsupportedProjectVersion {
                version: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ProjectVersion {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProjectVersion> for String {
    fn from(version: ProjectVersion) -> Self {
        version.as_str().to_string()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Project-level configuration shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub version: ProjectVersion,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<GroupVersionKind>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub multigroup: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub component_config: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub layout: String,

    /// Plugin-private sections, preserved as opaque values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, serde_json::Value>,
}

impl ProjectConfig {
    pub fn new(version: ProjectVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn has_resource(&self, gvk: &GroupVersionKind) -> bool {
        self.resources.contains(gvk)
    }

    /// Track a new resource; an already tracked triple is rejected untouched.
    pub fn add_resource(&mut self, gvk: GroupVersionKind) -> Result<(), DomainError> {
        if self.has_resource(&gvk) {
            return Err(DomainError::ResourceAlreadyTracked {
                gvk: gvk.to_string(),
            });
        }
        self.resources.push(gvk);
        Ok(())
    }

    /// Track a resource, accepting one that is already present.
    pub fn update_resource(&mut self, gvk: GroupVersionKind) {
        if !self.has_resource(&gvk) {
            self.resources.push(gvk);
        }
    }

    /// Case-insensitive check for any resource in `group`.
    pub fn has_group(&self, group: &str) -> bool {
        self.resources
            .iter()
            .any(|r| r.group.eq_ignore_ascii_case(group))
    }

    /// Fields introduced after version 2 must stay empty in v2 projects.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version != ProjectVersion::V2 {
            return Ok(());
        }
        let unsupported = [
            ("projectName", !self.project_name.is_empty()),
            ("layout", !self.layout.is_empty()),
            ("componentConfig", self.component_config),
            ("plugins", !self.plugins.is_empty()),
        ];
        match unsupported.into_iter().find(|(_, set)| *set) {
            Some((field, _)) => Err(DomainError::UnsupportedField {
                field,
                version: self.version.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Enforce uniqueness and the single-group rule before adding `gvk`.
    pub fn check_new_resource(&self, gvk: &GroupVersionKind, force: bool) -> Result<(), DomainError> {
        if self.has_resource(gvk) && !force {
            return Err(DomainError::ResourceAlreadyTracked {
                gvk: gvk.to_string(),
            });
        }
        if !self.multigroup && !self.resources.is_empty() && !self.has_group(&gvk.group) {
            return Err(DomainError::MultipleGroupsNotAllowed {
                group: gvk.group.clone(),
            });
        }
        Ok(())
    }
}
