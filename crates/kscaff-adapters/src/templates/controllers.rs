//! Reconciler skeleton and the envtest suite that registers every API.

use kscaff_core::domain::{
    CodeFragmentsMap, IfExistsAction, Inserter, Marker, Template, TemplateBody, TemplateContext,
    TemplateSpec,
};
use serde::Serialize;

use super::{controllers_dir, error_unless, markers, multi_group};

/// Go package name of the controllers directory.
fn package_name(ctx: &TemplateContext) -> String {
    match (&ctx.resource, multi_group(ctx)) {
        (Some(resource), true) => resource.group_package_name.clone(),
        _ => "controllers".to_string(),
    }
}

// ── controller ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct Controller {
    #[serde(flatten)]
    ctx: TemplateContext,
    #[serde(skip)]
    pub force: bool,
    package_name: String,
}

impl Controller {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            ..Self::default()
        }
    }
}

builder!(Controller, [Repository, MultiGroup, Boilerplate, Resource]);

impl Template for Controller {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: format!("{}/%[kind]_controller.go", controllers_dir(&self.ctx)),
            body: TemplateBody::Parameterized(CONTROLLER),
            if_exists: error_unless(self.force),
        }
    }

    fn set_defaults(&mut self) -> Result<(), kscaff_core::domain::DomainError> {
        self.package_name = package_name(&self.ctx);
        Ok(())
    }
}

const CONTROLLER: &str = r#"{{ boilerplate }}

package {{ package_name }}

import (
	"context"

	"github.com/go-logr/logr"
	"k8s.io/apimachinery/pkg/runtime"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"

	{{ resource.import_alias }} "{{ resource.package }}"
)

// {{ resource.kind }}Reconciler reconciles a {{ resource.kind }} object
type {{ resource.kind }}Reconciler struct {
	client.Client
	Log    logr.Logger
	Scheme *runtime.Scheme
}

// +kubebuilder:rbac:groups={{ resource.domain }},resources={{ resource.plural }},verbs=get;list;watch;create;update;patch;delete
// +kubebuilder:rbac:groups={{ resource.domain }},resources={{ resource.plural }}/status,verbs=get;update;patch

func (r *{{ resource.kind }}Reconciler) Reconcile(req ctrl.Request) (ctrl.Result, error) {
	_ = context.Background()
	_ = r.Log.WithValues("{{ resource.kind | lower }}", req.NamespacedName)

	// your logic here

	return ctrl.Result{}, nil
}

func (r *{{ resource.kind }}Reconciler) SetupWithManager(mgr ctrl.Manager) error {
	return ctrl.NewControllerManagedBy(mgr).
		For(&{{ resource.import_alias }}.{{ resource.kind }}{}).
		Complete(r)
}
"#;

// ── suite_test.go ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct SuiteTest {
    #[serde(flatten)]
    ctx: TemplateContext,
    package_name: String,
    crd_path: String,
    imports_marker: String,
    scheme_marker: String,
}

impl SuiteTest {
    pub fn new() -> Self {
        Self::default()
    }

    fn path(&self) -> String {
        format!("{}/suite_test.go", controllers_dir(&self.ctx))
    }
}

builder!(SuiteTest, [MultiGroup, Boilerplate, Resource]);

impl Template for SuiteTest {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: self.path(),
            body: TemplateBody::Parameterized(SUITE_TEST),
            if_exists: IfExistsAction::Skip,
        }
    }

    fn set_defaults(&mut self) -> Result<(), kscaff_core::domain::DomainError> {
        let path = self.path();
        self.package_name = package_name(&self.ctx);
        self.crd_path = if multi_group(&self.ctx) {
            r#""..", "..", "config", "crd", "bases""#.to_string()
        } else {
            r#""..", "config", "crd", "bases""#.to_string()
        };
        self.imports_marker = Marker::for_path(&path, markers::IMPORTS).to_string();
        self.scheme_marker = Marker::for_path(&path, markers::SCHEME).to_string();
        Ok(())
    }
}

const SUITE_TEST: &str = r#"{{ boilerplate }}

package {{ package_name }}

import (
	"path/filepath"
	"testing"

	. "github.com/onsi/ginkgo"
	. "github.com/onsi/gomega"
	"k8s.io/client-go/kubernetes/scheme"
	"k8s.io/client-go/rest"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/envtest"
	"sigs.k8s.io/controller-runtime/pkg/envtest/printer"
	logf "sigs.k8s.io/controller-runtime/pkg/log"
	"sigs.k8s.io/controller-runtime/pkg/log/zap"
	{{ imports_marker }}
)

// These tests use Ginkgo (BDD-style Go testing framework). Refer to
// http://onsi.github.io/ginkgo/ to learn more about Ginkgo.

var cfg *rest.Config
var k8sClient client.Client
var testEnv *envtest.Environment

func TestAPIs(t *testing.T) {
	RegisterFailHandler(Fail)

	RunSpecsWithDefaultAndCustomReporters(t,
		"Controller Suite",
		[]Reporter{printer.NewlineReporter{}})
}

var _ = BeforeSuite(func(done Done) {
	logf.SetLogger(zap.LoggerTo(GinkgoWriter, true))

	By("bootstrapping test environment")
	testEnv = &envtest.Environment{
		CRDDirectoryPaths: []string{filepath.Join({{ crd_path }})},
	}

	var err error
	cfg, err = testEnv.Start()
	Expect(err).ToNot(HaveOccurred())
	Expect(cfg).ToNot(BeNil())

	{{ scheme_marker }}

	k8sClient, err = client.New(cfg, client.Options{Scheme: scheme.Scheme})
	Expect(err).ToNot(HaveOccurred())
	Expect(k8sClient).ToNot(BeNil())

	close(done)
}, 60)

var _ = AfterSuite(func() {
	By("tearing down the test environment")
	err := testEnv.Stop()
	Expect(err).ToNot(HaveOccurred())
})
"#;

/// Registers a new API package with the suite's scheme.
#[derive(Debug, Default)]
pub struct SuiteTestUpdater {
    pub(crate) ctx: TemplateContext,
    pub wire_resource: bool,
}

builder!(SuiteTestUpdater, [MultiGroup, Resource]);

impl Inserter for SuiteTestUpdater {
    fn path(&self) -> String {
        format!("{}/suite_test.go", controllers_dir(&self.ctx))
    }

    fn markers(&self) -> Vec<Marker> {
        let path = self.path();
        [markers::IMPORTS, markers::SCHEME]
            .into_iter()
            .map(|name| Marker::for_path(&path, name))
            .collect()
    }

    fn code_fragments(&self) -> CodeFragmentsMap {
        let mut fragments = CodeFragmentsMap::new();
        let Some(resource) = &self.ctx.resource else {
            return fragments;
        };
        if !self.wire_resource {
            return fragments;
        }
        let path = self.path();
        fragments.insert(
            Marker::for_path(&path, markers::IMPORTS),
            vec![format!("{} \"{}\"", resource.import_alias, resource.package)],
        );
        fragments.insert(
            Marker::for_path(&path, markers::SCHEME),
            vec![format!(
                "err = {}.AddToScheme(scheme.Scheme)\nExpect(err).NotTo(HaveOccurred())\n",
                resource.import_alias
            )],
        );
        fragments
    }
}
