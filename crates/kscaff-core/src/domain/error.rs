// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable and comparable (asserted on directly in tests)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("{field} cannot be empty")]
    MissingRequiredField { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    InvalidResource { field: &'static str, reason: String },

    #[error("domain '{domain}' is invalid: {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("project name '{name}' is invalid: {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("repository '{repo}' is invalid: {reason}")]
    InvalidRepository { repo: String, reason: String },

    #[error("at least one of --defaulting, --programmatic-validation and --conversion must be set")]
    NoWebhookSelected,

    #[error("at least one of --resource and --controller must be set")]
    NothingToScaffold,

    #[error("unknown pattern '{name}'")]
    UnknownPattern { name: String },

    #[error("unknown license '{name}'")]
    UnknownLicense { name: String },

    #[error("path '{path}' has placeholders but no resource is available to resolve them")]
    UnresolvedPlaceholder { path: String },

    #[error("template for '{path}' requires {field} but it was not provided")]
    MissingTemplateData { path: String, field: &'static str },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("unsupported project version '{version}'")]
    UnsupportedProjectVersion { version: String },

    #[error("field '{field}' is not supported by project version {version}")]
    UnsupportedField { field: &'static str, version: String },

    #[error("multiple groups are not allowed by default, to enable multi-group visit kubebuilder.io/migration/multi-group.html (group '{group}')")]
    MultipleGroupsNotAllowed { group: String },

    // ========================================================================
    // Conflict Errors
    // ========================================================================
    #[error("API resource already exists: {gvk}")]
    ResourceAlreadyTracked { gvk: String },

    #[error("project is already initialized")]
    ProjectAlreadyInitialized,

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("project is not initialized, run 'kscaff init' first")]
    ProjectNotInitialized,

    #[error("API resource {gvk} does not exist, create it with 'kscaff create api' first")]
    ResourceNotTracked { gvk: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for {field}"),
                "Use --help for usage information".into(),
            ],
            Self::InvalidResource { field, .. } => match *field {
                "group" => vec![
                    "Groups must be DNS-1123 subdomains, e.g. 'ship' or 'crew.example'".into(),
                ],
                "version" => vec!["Versions look like v1, v1alpha1 or v2beta3".into()],
                "kind" => vec![
                    "Kinds are CamelCase and start with an uppercase letter, e.g. 'Frigate'"
                        .into(),
                ],
                _ => vec!["Check the resource flags and try again".into()],
            },
            Self::InvalidDomain { .. } => vec![
                "Domains must be DNS-1123 subdomains, e.g. 'example.org'".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Project names must be DNS-1123 labels: lowercase letters, digits and '-'".into(),
                "Example: kscaff init --project-name my-operator".into(),
            ],
            Self::InvalidRepository { .. } => vec![
                "Pass the Go module path with --repo, e.g. github.com/example/operator".into(),
            ],
            Self::NoWebhookSelected => vec![
                "Example: kscaff create webhook --group ship --version v1 --kind Frigate --defaulting"
                    .into(),
            ],
            Self::NothingToScaffold => {
                vec!["Pass --resource and/or --controller (both default to true)".into()]
            }
            Self::UnknownPattern { .. } => vec!["Supported patterns: addon".into()],
            Self::UnknownLicense { .. } => vec!["Supported licenses: apache2, none".into()],
            Self::UnsupportedProjectVersion { .. } => {
                vec!["Supported project versions: 2, 3-alpha".into()]
            }
            Self::UnsupportedField { .. } => vec![
                "Remove the field from the PROJECT file or upgrade the project version".into(),
            ],
            Self::MultipleGroupsNotAllowed { .. } => vec![
                "Enable multi-group layout with: kscaff edit --multigroup=true".into(),
            ],
            Self::ResourceAlreadyTracked { .. } => vec![
                "Use --force to scaffold the resource again".into(),
                "Pick a different group, version or kind".into(),
            ],
            Self::ProjectAlreadyInitialized => vec![
                "A PROJECT file already exists in this directory".into(),
                "Run the command from an empty directory".into(),
            ],
            Self::ProjectNotInitialized => vec!["Run: kscaff init --domain <domain>".into()],
            Self::ResourceNotTracked { .. } => {
                vec!["Run 'kscaff create api' for this group/version/kind first".into()]
            }
            _ => vec!["This looks like a template bug, please report it".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredField { .. }
            | Self::InvalidResource { .. }
            | Self::InvalidDomain { .. }
            | Self::InvalidProjectName { .. }
            | Self::InvalidRepository { .. }
            | Self::NoWebhookSelected
            | Self::NothingToScaffold
            | Self::UnknownPattern { .. }
            | Self::UnknownLicense { .. } => ErrorCategory::Validation,
            Self::UnsupportedProjectVersion { .. }
            | Self::UnsupportedField { .. }
            | Self::MultipleGroupsNotAllowed { .. } => ErrorCategory::Compatibility,
            Self::ResourceAlreadyTracked { .. } | Self::ProjectAlreadyInitialized => {
                ErrorCategory::Conflict
            }
            Self::ProjectNotInitialized | Self::ResourceNotTracked { .. } => {
                ErrorCategory::NotFound
            }
            Self::UnresolvedPlaceholder { .. } | Self::MissingTemplateData { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Conflict,
    NotFound,
    Internal,
}
