//! API package files: types, group-version info, sample CR and webhook.

use kscaff_core::domain::{IfExistsAction, Template, TemplateBody, TemplateContext, TemplateSpec};
use serde::Serialize;

use super::{api_dir, error_unless};

// ── types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct Types {
    #[serde(flatten)]
    ctx: TemplateContext,
    #[serde(skip)]
    pub force: bool,
}

impl Types {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            ..Self::default()
        }
    }
}

builder!(Types, [MultiGroup, Boilerplate, Resource]);

impl Template for Types {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: format!("{}/%[kind]_types.go", api_dir(&self.ctx)),
            body: TemplateBody::Parameterized(TYPES),
            if_exists: error_unless(self.force),
        }
    }
}

const TYPES: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
)

// EDIT THIS FILE!  THIS IS SCAFFOLDING FOR YOU TO OWN!
// NOTE: json tags are required.  Any new fields you add must have json tags for the fields to be serialized.

// {{ resource.kind }}Spec defines the desired state of {{ resource.kind }}
type {{ resource.kind }}Spec struct {
	// INSERT ADDITIONAL SPEC FIELDS - desired state of cluster
	// Important: Run "make" to regenerate code after modifying this file

	// Foo is an example field of {{ resource.kind }}. Edit {{ resource.kind | lower }}_types.go to remove/update
	Foo string `json:"foo,omitempty"`
}

// {{ resource.kind }}Status defines the observed state of {{ resource.kind }}
type {{ resource.kind }}Status struct {
	// INSERT ADDITIONAL STATUS FIELD - define observed state of cluster
	// Important: Run "make" to regenerate code after modifying this file
}

// +kubebuilder:object:root=true
// +kubebuilder:subresource:status
{%- if not resource.namespaced %}
// +kubebuilder:resource:scope=Cluster
{%- endif %}

// {{ resource.kind }} is the Schema for the {{ resource.plural }} API
type {{ resource.kind }} struct {
	metav1.TypeMeta   `json:",inline"`
	metav1.ObjectMeta `json:"metadata,omitempty"`

	Spec   {{ resource.kind }}Spec   `json:"spec,omitempty"`
	Status {{ resource.kind }}Status `json:"status,omitempty"`
}

// +kubebuilder:object:root=true

// {{ resource.kind }}List contains a list of {{ resource.kind }}
type {{ resource.kind }}List struct {
	metav1.TypeMeta `json:",inline"`
	metav1.ListMeta `json:"metadata,omitempty"`
	Items           []{{ resource.kind }} `json:"items"`
}

func init() {
	SchemeBuilder.Register(&{{ resource.kind }}{}, &{{ resource.kind }}List{})
}
"#;

// ── groupversion_info.go ─────────────────────────────────────────────────────

/// Package-level registration shared by every kind of a group version.
#[derive(Debug, Default, Serialize)]
pub struct Group {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(Group, [MultiGroup, Boilerplate, Resource]);

impl Template for Group {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: format!("{}/groupversion_info.go", api_dir(&self.ctx)),
            body: TemplateBody::Parameterized(GROUP),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const GROUP: &str = r#"{{ boilerplate }}

// Package {{ resource.version }} contains API Schema definitions for the {{ resource.group }} {{ resource.version }} API group
// +kubebuilder:object:generate=true
// +groupName={{ resource.domain }}
package {{ resource.version }}

import (
	"k8s.io/apimachinery/pkg/runtime/schema"
	"sigs.k8s.io/controller-runtime/pkg/scheme"
)

var (
	// GroupVersion is group version used to register these objects
	GroupVersion = schema.GroupVersion{Group: "{{ resource.domain }}", Version: "{{ resource.version }}"}

	// SchemeBuilder is used to add go types to the GroupVersionKind scheme
	SchemeBuilder = &scheme.Builder{GroupVersion: GroupVersion}

	// AddToScheme adds the types in this group-version to the given scheme.
	AddToScheme = SchemeBuilder.AddToScheme
)
"#;

// ── sample CR ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct CrdSample {
    #[serde(flatten)]
    ctx: TemplateContext,
    #[serde(skip)]
    pub force: bool,
}

impl CrdSample {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            ..Self::default()
        }
    }
}

builder!(CrdSample, [Resource]);

impl Template for CrdSample {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/samples/%[group]_%[version]_%[kind].yaml".into(),
            body: TemplateBody::Parameterized(CRD_SAMPLE),
            if_exists: error_unless(self.force),
        }
    }
}

const CRD_SAMPLE: &str = r#"apiVersion: {{ resource.domain }}/{{ resource.version }}
kind: {{ resource.kind }}
metadata:
  name: {{ resource.kind | lower }}-sample
spec:
  # Add fields here
  foo: bar
"#;

// ── webhook ──────────────────────────────────────────────────────────────────

/// Defaulting and/or validating webhook for a kind.
#[derive(Debug, Default, Serialize)]
pub struct Webhook {
    #[serde(flatten)]
    ctx: TemplateContext,
    pub defaulting: bool,
    pub validating: bool,
    /// Qualified group with '.' replaced by '-', filled in by `set_defaults`.
    qualified_group_with_dash: String,
}

impl Webhook {
    pub fn new(defaulting: bool, validating: bool) -> Self {
        Self {
            defaulting,
            validating,
            ..Self::default()
        }
    }
}

builder!(Webhook, [MultiGroup, Boilerplate, Resource]);

impl Template for Webhook {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: format!("{}/%[kind]_webhook.go", api_dir(&self.ctx)),
            body: TemplateBody::Parameterized(WEBHOOK),
            if_exists: IfExistsAction::Error,
        }
    }

    fn set_defaults(&mut self) -> Result<(), kscaff_core::domain::DomainError> {
        if let Some(resource) = &self.ctx.resource {
            self.qualified_group_with_dash = resource.domain.replace('.', "-");
        }
        Ok(())
    }
}

const WEBHOOK: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	ctrl "sigs.k8s.io/controller-runtime"
	logf "sigs.k8s.io/controller-runtime/pkg/log"
	{%- if validating %}
	"k8s.io/apimachinery/pkg/runtime"
	{%- endif %}
	{%- if defaulting or validating %}
	"sigs.k8s.io/controller-runtime/pkg/webhook"
	{%- endif %}
)

// log is for logging in this package.
var {{ resource.kind | lower }}log = logf.Log.WithName("{{ resource.kind | lower }}-resource")

func (r *{{ resource.kind }}) SetupWebhookWithManager(mgr ctrl.Manager) error {
	return ctrl.NewWebhookManagedBy(mgr).
		For(r).
		Complete()
}

// EDIT THIS FILE!  THIS IS SCAFFOLDING FOR YOU TO OWN!
{%- if defaulting %}

// +kubebuilder:webhook:path=/mutate-{{ qualified_group_with_dash }}-{{ resource.version }}-{{ resource.kind | lower }},mutating=true,failurePolicy=fail,groups={{ resource.domain }},resources={{ resource.plural }},verbs=create;update,versions={{ resource.version }},name=m{{ resource.kind | lower }}.kb.io

var _ webhook.Defaulter = &{{ resource.kind }}{}

// Default implements webhook.Defaulter so a webhook will be registered for the type
func (r *{{ resource.kind }}) Default() {
	{{ resource.kind | lower }}log.Info("default", "name", r.Name)

	// TODO(user): fill in your defaulting logic.
}
{%- endif %}
{%- if validating %}

// TODO(user): change verbs to "verbs=create;update;delete" if you want to enable deletion validation.
// +kubebuilder:webhook:verbs=create;update,path=/validate-{{ qualified_group_with_dash }}-{{ resource.version }}-{{ resource.kind | lower }},mutating=false,failurePolicy=fail,groups={{ resource.domain }},resources={{ resource.plural }},versions={{ resource.version }},name=v{{ resource.kind | lower }}.kb.io

var _ webhook.Validator = &{{ resource.kind }}{}

// ValidateCreate implements webhook.Validator so a webhook will be registered for the type
func (r *{{ resource.kind }}) ValidateCreate() error {
	{{ resource.kind | lower }}log.Info("validate create", "name", r.Name)

	// TODO(user): fill in your validation logic upon object creation.
	return nil
}

// ValidateUpdate implements webhook.Validator so a webhook will be registered for the type
func (r *{{ resource.kind }}) ValidateUpdate(old runtime.Object) error {
	{{ resource.kind | lower }}log.Info("validate update", "name", r.Name)

	// TODO(user): fill in your validation logic upon object update.
	return nil
}

// ValidateDelete implements webhook.Validator so a webhook will be registered for the type
func (r *{{ resource.kind }}) ValidateDelete() error {
	{{ resource.kind | lower }}log.Info("validate delete", "name", r.Name)

	// TODO(user): fill in your validation logic upon object deletion.
	return nil
}
{%- endif %}
"#;
