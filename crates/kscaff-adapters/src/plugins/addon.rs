//! `--pattern addon`: declarative add-on operators.
//!
//! Swaps the generated types and controller for variants built on
//! kubebuilder-declarative-pattern and adds a manifest channel.

use kscaff_core::{
    application::{ApplicationError, Plugin, ports::TemplateRenderer},
    domain::{
        FileModel, IfExistsAction, Resource, Universe, default_funcs, format_go_source,
    },
    error::KscaffResult,
};
use serde_json::json;
use tracing::debug;

/// Pinned by `go get` after an add-on API is scaffolded.
pub const DECLARATIVE_PATTERN_VERSION: &str = "v0.0.0-20200522144838-848d48e5b073";

pub struct AddonPlugin {
    renderer: Box<dyn TemplateRenderer>,
}

impl AddonPlugin {
    pub fn new(renderer: impl TemplateRenderer + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
        }
    }

    fn render(&self, path: &str, body: &str, data: &serde_json::Value) -> KscaffResult<String> {
        self.renderer.render(path, body, data, &default_funcs())
    }

    /// Replace the model at `path` if this batch produced one.
    ///
    /// Returns whether a model was replaced.
    fn replace_go(
        &self,
        universe: &mut Universe,
        path: String,
        body: &str,
        data: &serde_json::Value,
    ) -> KscaffResult<bool> {
        if !universe.files.contains_key(&path) {
            return Ok(false);
        }
        let raw = self.render(&path, body, data)?;
        let contents = format_go_source(&raw, &universe.config.repo).map_err(|cause| {
            ApplicationError::Format {
                path: path.clone(),
                cause,
                raw,
            }
        })?;
        debug!(path = %path, "replaced with add-on variant");
        universe.files.insert(
            path.clone(),
            FileModel {
                path,
                contents,
                if_exists: IfExistsAction::Overwrite,
            },
        );
        Ok(true)
    }

    fn add(
        &self,
        universe: &mut Universe,
        path: String,
        body: &str,
        data: &serde_json::Value,
        if_exists: IfExistsAction,
    ) -> KscaffResult<()> {
        let contents = self.render(&path, body, data)?;
        debug!(path = %path, "added add-on file");
        universe.files.insert(
            path.clone(),
            FileModel {
                path,
                contents,
                if_exists,
            },
        );
        Ok(())
    }
}

impl std::fmt::Debug for AddonPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddonPlugin").finish_non_exhaustive()
    }
}

fn api_path(resource: &Resource, multigroup: bool, file: &str) -> String {
    if multigroup {
        format!("apis/{}/{}/{file}", resource.group, resource.version)
    } else {
        format!("api/{}/{file}", resource.version)
    }
}

fn controller_path(resource: &Resource, multigroup: bool, file: &str) -> String {
    if multigroup {
        format!("controllers/{}/{file}", resource.group)
    } else {
        format!("controllers/{file}")
    }
}

impl Plugin for AddonPlugin {
    fn name(&self) -> &str {
        "addon"
    }

    fn pipe(&self, universe: &mut Universe) -> KscaffResult<()> {
        // Batches without a resource have nothing to swap.
        let Some(resource) = universe.resource.clone() else {
            return Ok(());
        };
        let multigroup = universe.config.multigroup;
        let kind = resource.kind.to_lowercase();
        let package_name = if multigroup {
            resource.group_package_name.clone()
        } else {
            "controllers".to_string()
        };
        let data = json!({
            "boilerplate": universe.boilerplate.clone().unwrap_or_default(),
            "resource": resource,
            "package_name": package_name,
        });

        let has_types = self.replace_go(
            universe,
            api_path(&resource, multigroup, &format!("{kind}_types.go")),
            TYPES,
            &data,
        )?;
        self.replace_go(
            universe,
            controller_path(&resource, multigroup, &format!("{kind}_controller.go")),
            CONTROLLER,
            &data,
        )?;

        // Channel files belong to the batch that creates the API types.
        if !has_types {
            return Ok(());
        }
        self.add(
            universe,
            format!("channels/packages/{kind}/0.0.1/manifest.yaml"),
            MANIFEST,
            &data,
            IfExistsAction::Error,
        )?;
        self.add(
            universe,
            "channels/stable".to_string(),
            STABLE_CHANNEL,
            &data,
            IfExistsAction::Skip,
        )
    }
}

const TYPES: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
	addonv1alpha1 "sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/addon/pkg/apis/v1alpha1"
)

// EDIT THIS FILE!  THIS IS SCAFFOLDING FOR YOU TO OWN!
// NOTE: json tags are required.  Any new fields you add must have json tags for the fields to be serialized.

// {{ resource.kind }}Spec defines the desired state of {{ resource.kind }}
type {{ resource.kind }}Spec struct {
	addonv1alpha1.CommonSpec `json:",inline"`
	addonv1alpha1.PatchSpec  `json:",inline"`

	// INSERT ADDITIONAL SPEC FIELDS - desired state of cluster
	// Important: Run "make" to regenerate code after modifying this file
}

// {{ resource.kind }}Status defines the observed state of {{ resource.kind }}
type {{ resource.kind }}Status struct {
	addonv1alpha1.CommonStatus `json:",inline"`

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

var _ addonv1alpha1.CommonObject = &{{ resource.kind }}{}

func (o *{{ resource.kind }}) ComponentName() string {
	return "{{ resource.kind | lower }}"
}

func (o *{{ resource.kind }}) CommonSpec() addonv1alpha1.CommonSpec {
	return o.Spec.CommonSpec
}

func (o *{{ resource.kind }}) PatchSpec() addonv1alpha1.PatchSpec {
	return o.Spec.PatchSpec
}

func (o *{{ resource.kind }}) GetCommonStatus() addonv1alpha1.CommonStatus {
	return o.Status.CommonStatus
}

func (o *{{ resource.kind }}) SetCommonStatus(s addonv1alpha1.CommonStatus) {
	o.Status.CommonStatus = s
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

const CONTROLLER: &str = r#"{{ boilerplate }}

package {{ package_name }}

import (
	"github.com/go-logr/logr"
	"k8s.io/apimachinery/pkg/runtime"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/controller"
	"sigs.k8s.io/controller-runtime/pkg/handler"
	"sigs.k8s.io/controller-runtime/pkg/reconcile"
	"sigs.k8s.io/controller-runtime/pkg/source"
	"sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/addon"
	"sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/addon/pkg/status"
	"sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/declarative"

	api "{{ resource.package }}"
)

var _ reconcile.Reconciler = &{{ resource.kind }}Reconciler{}

// {{ resource.kind }}Reconciler reconciles a {{ resource.kind }} object
type {{ resource.kind }}Reconciler struct {
	client.Client
	Log    logr.Logger
	Scheme *runtime.Scheme

	declarative.Reconciler
}

// +kubebuilder:rbac:groups={{ resource.domain }},resources={{ resource.plural }},verbs=get;list;watch;create;update;patch;delete
// +kubebuilder:rbac:groups={{ resource.domain }},resources={{ resource.plural }}/status,verbs=get;update;patch

func (r *{{ resource.kind }}Reconciler) SetupWithManager(mgr ctrl.Manager) error {
	addon.Init()

	labels := map[string]string{
		"k8s-app": "{{ resource.kind | lower }}",
	}

	watchLabels := declarative.SourceLabel(mgr.GetScheme())

	if err := r.Reconciler.Init(mgr, &api.{{ resource.kind }}{},
		declarative.WithObjectTransform(declarative.AddLabels(labels)),
		declarative.WithOwner(declarative.SourceAsOwner),
		declarative.WithLabels(watchLabels),
		declarative.WithStatus(status.NewBasic(mgr.GetClient())),
		declarative.WithObjectTransform(addon.ApplyPatches),
	); err != nil {
		return err
	}

	c, err := controller.New("{{ resource.kind | lower }}-controller", mgr, controller.Options{Reconciler: r})
	if err != nil {
		return err
	}

	// Watch for changes to {{ resource.kind }}
	err = c.Watch(&source.Kind{Type: &api.{{ resource.kind }}{}}, &handler.EnqueueRequestForObject{})
	if err != nil {
		return err
	}

	// Watch for changes to deployed objects
	_, err = declarative.WatchAll(mgr.GetConfig(), c, r, watchLabels)
	if err != nil {
		return err
	}

	return nil
}
"#;

const MANIFEST: &str = "# Placeholder manifest - replace with the manifest for your addon
";

const STABLE_CHANNEL: &str = "# Versions for the stable channel
manifests:
- version: 0.0.1
";

#[cfg(test)]
mod tests {
    use kscaff_core::domain::{ProjectConfig, ResourceOptions};

    use super::*;
    use crate::renderer::TeraRenderer;

    fn universe(with_models: bool) -> Universe {
        let mut config = ProjectConfig::default();
        config.domain = "example.org".into();
        config.repo = "example.com/m".into();
        let resource = ResourceOptions::new("ship", "v1beta1", "Frigate").new_resource(&config, true);
        let mut universe = Universe::new(config)
            .with_boilerplate("/*\nCopyright 2026.\n*/")
            .with_resource(resource);
        if with_models {
            for path in ["api/v1beta1/frigate_types.go", "controllers/frigate_controller.go"] {
                universe.files.insert(
                    path.to_string(),
                    FileModel {
                        path: path.to_string(),
                        contents: "package placeholder\n".into(),
                        if_exists: IfExistsAction::Error,
                    },
                );
            }
        }
        universe
    }

    #[test]
    fn replaces_types_and_controller_and_adds_channel() {
        let mut universe = universe(true);
        AddonPlugin::new(TeraRenderer::new()).pipe(&mut universe).unwrap();

        let types = &universe.files["api/v1beta1/frigate_types.go"];
        assert!(types.contents.contains("addonv1alpha1.CommonSpec `json:\",inline\"`"));
        assert!(types.contents.contains("return \"frigate\""));
        assert_eq!(types.if_exists, IfExistsAction::Overwrite);

        let controller = &universe.files["controllers/frigate_controller.go"];
        assert!(controller.contents.contains("package controllers"));
        assert!(controller.contents.contains("api \"example.com/m/api/v1beta1\""));

        assert!(universe.files.contains_key("channels/packages/frigate/0.0.1/manifest.yaml"));
        assert_eq!(
            universe.files["channels/stable"].contents,
            "# Versions for the stable channel\nmanifests:\n- version: 0.0.1\n"
        );
    }

    #[test]
    fn missing_models_are_not_invented() {
        let mut universe = universe(false);
        AddonPlugin::new(TeraRenderer::new()).pipe(&mut universe).unwrap();

        assert!(!universe.files.contains_key("api/v1beta1/frigate_types.go"));
        assert!(universe.files.is_empty());
    }

    #[test]
    fn batches_without_resource_are_untouched() {
        let mut universe = Universe::new(ProjectConfig::default());
        AddonPlugin::new(TeraRenderer::new()).pipe(&mut universe).unwrap();
        assert!(universe.files.is_empty());
    }
}
