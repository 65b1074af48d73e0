//! Project root files: go.mod, Makefile, Dockerfile, .gitignore and main.go.

use kscaff_core::domain::{
    CodeFragmentsMap, FuncMap, IfExistsAction, Inserter, Marker, Template, TemplateBody,
    TemplateContext, TemplateFn, TemplateSpec, naming,
};
use serde::Serialize;

use super::markers;

pub const CONTROLLER_RUNTIME_VERSION: &str = "v0.6.4";
pub const CONTROLLER_TOOLS_VERSION: &str = "v0.3.0";
pub const KUSTOMIZE_VERSION: &str = "v3.5.4";
pub const DEFAULT_IMAGE: &str = "controller:latest";

pub const MAIN_PATH: &str = "main.go";
pub const DOCKERFILE_PATH: &str = "Dockerfile";

// ── go.mod ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GoMod {
    #[serde(flatten)]
    ctx: TemplateContext,
    controller_runtime_version: &'static str,
}

impl Default for GoMod {
    fn default() -> Self {
        Self {
            ctx: TemplateContext::default(),
            controller_runtime_version: CONTROLLER_RUNTIME_VERSION,
        }
    }
}

builder!(GoMod, [Repository]);

impl Template for GoMod {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "go.mod".into(),
            body: TemplateBody::Parameterized(GO_MOD),
            if_exists: IfExistsAction::Overwrite,
        }
    }
}

const GO_MOD: &str = r#"module {{ repo }}

go 1.13

require (
	github.com/go-logr/logr v0.1.0
	github.com/onsi/ginkgo v1.12.1
	github.com/onsi/gomega v1.10.1
	k8s.io/apimachinery v0.18.6
	k8s.io/client-go v0.18.6
	sigs.k8s.io/controller-runtime {{ controller_runtime_version }}
)
"#;

// ── Makefile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Makefile {
    #[serde(flatten)]
    ctx: TemplateContext,
    image: String,
    boilerplate_path: &'static str,
    controller_tools_version: &'static str,
    kustomize_version: &'static str,
}

impl Makefile {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            ctx: TemplateContext::default(),
            image: image.into(),
            boilerplate_path: super::DEFAULT_BOILERPLATE_PATH,
            controller_tools_version: CONTROLLER_TOOLS_VERSION,
            kustomize_version: KUSTOMIZE_VERSION,
        }
    }
}

builder!(Makefile, []);

impl Template for Makefile {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "Makefile".into(),
            body: TemplateBody::Parameterized(MAKEFILE),
            if_exists: IfExistsAction::Error,
        }
    }
}

const MAKEFILE: &str = r##"
# Image URL to use all building/pushing image targets
IMG ?= {{ image }}
# Produce CRDs that work back to Kubernetes 1.11 (no version conversion)
CRD_OPTIONS ?= "crd:trivialVersions=true"

# Get the currently used golang install path (in GOPATH/bin, unless GOBIN is set)
ifeq (,$(shell go env GOBIN))
GOBIN=$(shell go env GOPATH)/bin
else
GOBIN=$(shell go env GOBIN)
endif

all: manager

# Run tests
test: generate fmt vet manifests
	go test ./... -coverprofile cover.out

# Build manager binary
manager: generate fmt vet
	go build -o bin/manager main.go

# Run against the configured Kubernetes cluster in ~/.kube/config
run: generate fmt vet manifests
	go run ./main.go

# Install CRDs into a cluster
install: manifests kustomize
	$(KUSTOMIZE) build config/crd | kubectl apply -f -

# Uninstall CRDs from a cluster
uninstall: manifests kustomize
	$(KUSTOMIZE) build config/crd | kubectl delete -f -

# Deploy controller in the configured Kubernetes cluster in ~/.kube/config
deploy: manifests kustomize
	cd config/manager && $(KUSTOMIZE) edit set image controller=${IMG}
	$(KUSTOMIZE) build config/default | kubectl apply -f -

# Generate manifests e.g. CRD, RBAC etc.
manifests: controller-gen
	$(CONTROLLER_GEN) $(CRD_OPTIONS) rbac:roleName=manager-role webhook paths="./..." output:crd:artifacts:config=config/crd/bases

# Run go fmt against code
fmt:
	go fmt ./...

# Run go vet against code
vet:
	go vet ./...

# Generate code
generate: controller-gen
	$(CONTROLLER_GEN) object:headerFile="{{ boilerplate_path }}" paths="./..."

# Build the docker image
docker-build: test
	docker build . -t ${IMG}

# Push the docker image
docker-push:
	docker push ${IMG}

# find or download controller-gen
controller-gen:
ifeq (, $(shell which controller-gen))
	go get sigs.k8s.io/controller-tools/cmd/controller-gen@{{ controller_tools_version }}
CONTROLLER_GEN=$(GOBIN)/controller-gen
else
CONTROLLER_GEN=$(shell which controller-gen)
endif

# find or download kustomize
kustomize:
ifeq (, $(shell which kustomize))
	go get sigs.k8s.io/kustomize/kustomize/v3@{{ kustomize_version }}
KUSTOMIZE=$(GOBIN)/kustomize
else
KUSTOMIZE=$(shell which kustomize)
endif
"##;

// ── Dockerfile ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct Dockerfile {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(Dockerfile, [MultiGroup]);

impl Template for Dockerfile {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: DOCKERFILE_PATH.into(),
            body: TemplateBody::Parameterized(DOCKERFILE),
            if_exists: IfExistsAction::Error,
        }
    }
}

/// The Dockerfile line copying the API packages for a layout.
pub fn api_copy_line(multi_group: bool) -> &'static str {
    if multi_group {
        "COPY apis/ apis/"
    } else {
        "COPY api/ api/"
    }
}

/// Existing Dockerfile rewritten in place for a new layout.
///
/// Written verbatim, without going through the renderer.
#[derive(Debug, Default, Serialize)]
pub struct DockerfileLayout {
    #[serde(skip)]
    ctx: TemplateContext,
    #[serde(skip)]
    contents: String,
}

impl DockerfileLayout {
    /// Swap the API copy line of `current` for the one matching `multi_group`.
    pub fn new(current: &str, multi_group: bool) -> Self {
        let contents = current
            .split_inclusive('\n')
            .map(|line| {
                if line.trim() == api_copy_line(!multi_group) {
                    line.replacen(api_copy_line(!multi_group), api_copy_line(multi_group), 1)
                } else {
                    line.to_string()
                }
            })
            .collect();
        Self {
            ctx: TemplateContext::default(),
            contents,
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

builder!(DockerfileLayout, []);

impl Template for DockerfileLayout {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: DOCKERFILE_PATH.into(),
            body: TemplateBody::Literal(self.contents.clone()),
            if_exists: IfExistsAction::Overwrite,
        }
    }
}

const DOCKERFILE: &str = r#"# Build the manager binary
FROM golang:1.13 as builder

WORKDIR /workspace
# Copy the Go Modules manifests
COPY go.mod go.mod
COPY go.sum go.sum
# cache deps before building and copying source so that we don't need to re-download as much
# and so that source changes don't invalidate our downloaded layer
RUN go mod download

# Copy the go source
COPY main.go main.go
{% if multi_group %}COPY apis/ apis/{% else %}COPY api/ api/{% endif %}
COPY controllers/ controllers/

# Build
RUN CGO_ENABLED=0 GOOS=linux GOARCH=amd64 GO111MODULE=on go build -a -o manager main.go

# Use distroless as minimal base image to package the manager binary
# Refer to https://github.com/GoogleContainerTools/distroless for more details
FROM gcr.io/distroless/static:nonroot
WORKDIR /
COPY --from=builder /workspace/manager .
USER nonroot:nonroot

ENTRYPOINT ["/manager"]
"#;

// ── .gitignore ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct GitIgnore {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(GitIgnore, []);

impl Template for GitIgnore {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: ".gitignore".into(),
            body: TemplateBody::Literal(GITIGNORE.into()),
            if_exists: IfExistsAction::Error,
        }
    }
}

const GITIGNORE: &str = r#"
# Binaries for programs and plugins
*.exe
*.exe~
*.dll
*.so
*.dylib
bin

# Test binary, build with `go test -c`
*.test

# Output of the go coverage tool, specifically when used with LiteIDE
*.out

# Kubernetes Generated files - skip generated files, except for vendored files

!vendor/**/zz_generated.*

# editor and IDE paraphernalia
.idea
*.swp
*.swo
*~
"#;

// ── main.go ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct Main {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(Main, [Boilerplate, Domain, Repository]);

impl Template for Main {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: MAIN_PATH.into(),
            body: TemplateBody::Parameterized(MAIN),
            if_exists: IfExistsAction::Error,
        }
    }

    fn funcs(&self) -> FuncMap {
        let mut funcs = FuncMap::new();
        funcs.insert("hash", naming::fnv32a as TemplateFn);
        funcs
    }
}

const MAIN: &str = r#"{{ boilerplate }}

package main

import (
	"flag"
	"os"

	"k8s.io/apimachinery/pkg/runtime"
	utilruntime "k8s.io/apimachinery/pkg/util/runtime"
	clientgoscheme "k8s.io/client-go/kubernetes/scheme"
	_ "k8s.io/client-go/plugin/pkg/client/auth/gcp"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/log/zap"
	// +kubebuilder:scaffold:imports
)

var (
	scheme   = runtime.NewScheme()
	setupLog = ctrl.Log.WithName("setup")
)

func init() {
	utilruntime.Must(clientgoscheme.AddToScheme(scheme))

	// +kubebuilder:scaffold:scheme
}

func main() {
	var metricsAddr string
	var enableLeaderElection bool
	flag.StringVar(&metricsAddr, "metrics-addr", ":8080", "The address the metric endpoint binds to.")
	flag.BoolVar(&enableLeaderElection, "enable-leader-election", false,
		"Enable leader election for controller manager. "+
			"Enabling this will ensure there is only one active controller manager.")
	flag.Parse()

	ctrl.SetLogger(zap.New(zap.UseDevMode(true)))

	mgr, err := ctrl.NewManager(ctrl.GetConfigOrDie(), ctrl.Options{
		Scheme:             scheme,
		MetricsBindAddress: metricsAddr,
		Port:               9443,
		LeaderElection:     enableLeaderElection,
		LeaderElectionID:   "{{ repo | hash }}.{{ domain }}",
	})
	if err != nil {
		setupLog.Error(err, "unable to start manager")
		os.Exit(1)
	}

	// +kubebuilder:scaffold:builder

	setupLog.Info("starting manager")
	if err := mgr.Start(ctrl.SetupSignalHandler()); err != nil {
		setupLog.Error(err, "problem running manager")
		os.Exit(1)
	}
}
"#;

/// Wires a resource's scheme, reconciler and webhook into main.go.
#[derive(Debug, Default)]
pub struct MainUpdater {
    pub(crate) ctx: TemplateContext,
    pub wire_resource: bool,
    pub wire_controller: bool,
    pub wire_webhook: bool,
}

builder!(MainUpdater, [Repository, MultiGroup, Resource]);

impl Inserter for MainUpdater {
    fn path(&self) -> String {
        MAIN_PATH.into()
    }

    fn markers(&self) -> Vec<Marker> {
        [markers::IMPORTS, markers::SCHEME, markers::BUILDER]
            .into_iter()
            .map(|name| Marker::for_path(MAIN_PATH, name))
            .collect()
    }

    fn code_fragments(&self) -> CodeFragmentsMap {
        let mut fragments = CodeFragmentsMap::new();
        let Some(resource) = &self.ctx.resource else {
            return fragments;
        };
        let repo = self.ctx.repo.as_deref().unwrap_or_default();
        let multi_group = super::multi_group(&self.ctx);

        let mut imports = Vec::new();
        let mut scheme = Vec::new();
        let mut setup = Vec::new();

        if self.wire_resource || self.wire_webhook {
            imports.push(format!("{} \"{}\"", resource.import_alias, resource.package));
        }
        if self.wire_resource {
            scheme.push(format!(
                "utilruntime.Must({}.AddToScheme(scheme))",
                resource.import_alias
            ));
        }
        if self.wire_controller {
            let package = if multi_group {
                imports.push(format!(
                    "{}controller \"{repo}/controllers/{}\"",
                    resource.group_package_name, resource.group
                ));
                format!("{}controller", resource.group_package_name)
            } else {
                imports.push(format!("\"{repo}/controllers\""));
                "controllers".to_string()
            };
            setup.push(format!(
                "if err = (&{package}.{kind}Reconciler{{\n\
                 \tClient: mgr.GetClient(),\n\
                 \tLog:    ctrl.Log.WithName(\"controllers\").WithName(\"{kind}\"),\n\
                 \tScheme: mgr.GetScheme(),\n\
                 }}).SetupWithManager(mgr); err != nil {{\n\
                 \tsetupLog.Error(err, \"unable to create controller\", \"controller\", \"{kind}\")\n\
                 \tos.Exit(1)\n\
                 }}",
                kind = resource.kind
            ));
        }
        if self.wire_webhook {
            setup.push(format!(
                "if err = (&{alias}.{kind}{{}}).SetupWebhookWithManager(mgr); err != nil {{\n\
                 \tsetupLog.Error(err, \"unable to create webhook\", \"webhook\", \"{kind}\")\n\
                 \tos.Exit(1)\n\
                 }}",
                alias = resource.import_alias,
                kind = resource.kind
            ));
        }

        for (name, code) in [
            (markers::IMPORTS, imports),
            (markers::SCHEME, scheme),
            (markers::BUILDER, setup),
        ] {
            if !code.is_empty() {
                fragments.insert(Marker::for_path(MAIN_PATH, name), code);
            }
        }
        fragments
    }
}
