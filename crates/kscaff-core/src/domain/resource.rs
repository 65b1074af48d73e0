//! Resource descriptors: the group/version/kind being scaffolded.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    config::ProjectConfig,
    error::DomainError,
    naming::{pluralize, safe_import},
    validation::DomainValidator,
};

/// Built-in Kubernetes API groups and the domain they live under.
///
/// When a controller is scaffolded for one of these groups without a new
/// resource, the API types are imported from `k8s.io/api` instead of the
/// project module.
const CORE_GROUPS: &[(&str, &str)] = &[
    ("admission", "k8s.io"),
    ("admissionregistration", "k8s.io"),
    ("apps", ""),
    ("auditregistration", "k8s.io"),
    ("apiextensions", "k8s.io"),
    ("authentication", "k8s.io"),
    ("authorization", "k8s.io"),
    ("autoscaling", ""),
    ("batch", ""),
    ("certificates", "k8s.io"),
    ("coordination", "k8s.io"),
    ("core", ""),
    ("events", "k8s.io"),
    ("extensions", ""),
    ("imagepolicy", "k8s.io"),
    ("networking", "k8s.io"),
    ("node", "k8s.io"),
    ("metrics", "k8s.io"),
    ("policy", ""),
    ("rbac.authorization", "k8s.io"),
    ("scheduling", "k8s.io"),
    ("setting", "k8s.io"),
    ("storage", "k8s.io"),
];

/// Group/version/kind triple as tracked in the PROJECT file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

/// User-supplied resource parameters, before derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOptions {
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Overrides the derived plural when set.
    pub plural: Option<String>,
    pub namespaced: bool,
}

impl ResourceOptions {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural: None,
            namespaced: true,
        }
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    pub fn with_namespaced(mut self, namespaced: bool) -> Self {
        self.namespaced = namespaced;
        self
    }

    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(&self.group, &self.version, &self.kind)
    }

    /// Check the options against Kubernetes naming rules.
    pub fn validate(&self) -> Result<(), DomainError> {
        // A leading '-' means a flag was swallowed as the value.
        for (field, value) in [
            ("group", &self.group),
            ("version", &self.version),
            ("kind", &self.kind),
        ] {
            if value.is_empty() || value.starts_with('-') {
                return Err(DomainError::MissingRequiredField { field });
            }
        }

        DomainValidator::dns1123_subdomain(&self.group).map_err(|reason| {
            DomainError::InvalidResource {
                field: "group",
                reason,
            }
        })?;

        DomainValidator::api_version(&self.version).map_err(|reason| {
            DomainError::InvalidResource {
                field: "version",
                reason,
            }
        })?;

        if !self.kind.starts_with(|c: char| c.is_uppercase()) {
            return Err(DomainError::InvalidResource {
                field: "kind",
                reason: "kind must start with an uppercase character".into(),
            });
        }
        DomainValidator::dns1035_label(&self.kind.to_lowercase()).map_err(|reason| {
            DomainError::InvalidResource {
                field: "kind",
                reason,
            }
        })?;

        if let Some(plural) = &self.plural {
            DomainValidator::dns1123_label(plural).map_err(|reason| {
                DomainError::InvalidResource {
                    field: "plural",
                    reason,
                }
            })?;
        }

        Ok(())
    }

    /// Derive the full descriptor for this project.
    ///
    /// `do_resource` is false when only a controller is scaffolded; in that
    /// case an untracked built-in group resolves to the upstream `k8s.io/api`
    /// package.
    pub fn new_resource(&self, config: &ProjectConfig, do_resource: bool) -> Resource {
        let plural = self
            .plural
            .clone()
            .unwrap_or_else(|| pluralize(&self.kind.to_lowercase()));

        let mut package = if config.multigroup {
            format!("{}/apis/{}/{}", config.repo, self.group, self.version)
        } else {
            format!("{}/api/{}", config.repo, self.version)
        };
        let mut domain = config.domain.clone();

        if !do_resource && !config.has_resource(&self.gvk()) {
            if let Some((_, core_domain)) = CORE_GROUPS.iter().find(|(g, _)| *g == self.group) {
                package = format!("k8s.io/api/{}/{}", self.group, self.version);
                domain = (*core_domain).to_string();
            }
        }

        let qualified_domain = if domain.is_empty() {
            self.group.clone()
        } else {
            format!("{}.{}", self.group, domain)
        };

        Resource {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: self.kind.clone(),
            plural,
            namespaced: self.namespaced,
            domain: qualified_domain,
            package,
            import_alias: safe_import(&format!("{}{}", self.group, self.version)),
            group_package_name: safe_import(&self.group),
        }
    }
}

/// Fully derived resource descriptor, read-only for templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub namespaced: bool,
    /// Group qualified with the project (or upstream) domain.
    pub domain: String,
    /// Go import path of the API package.
    pub package: String,
    pub import_alias: String,
    pub group_package_name: String,
}

impl Resource {
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(&self.group, &self.version, &self.kind)
    }

    /// Substitute `%[...]` placeholders in a template path.
    ///
    /// `%[kind]` is lower-cased; the other tokens are used verbatim.
    pub fn replace_path(&self, path: &str) -> String {
        path.replace("%[group]", &self.group)
            .replace("%[version]", &self.version)
            .replace("%[kind]", &self.kind.to_lowercase())
            .replace("%[plural]", &self.plural)
            .replace("%[package-name]", &self.group_package_name)
    }
}

/// True when the path still carries a `%[...]` token.
pub fn has_placeholders(path: &str) -> bool {
    path.find("%[").is_some_and(|start| path[start..].contains(']'))
}
