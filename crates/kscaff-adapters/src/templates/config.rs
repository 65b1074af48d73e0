//! Kustomize manifests under `config/`.
//!
//! Shared kustomizations are scaffolded once with a marker and grown by an
//! updater on every later `create api` or `create webhook`.

use kscaff_core::domain::{
    CodeFragmentsMap, IfExistsAction, Inserter, Marker, Template, TemplateBody, TemplateContext,
    TemplateSpec,
};
use serde::Serialize;

use super::markers;

pub const DEFAULT_KUSTOMIZATION_PATH: &str = "config/default/kustomization.yaml";
pub const CRD_KUSTOMIZATION_PATH: &str = "config/crd/kustomization.yaml";

fn single(path: &str, name: &str, code: String) -> CodeFragmentsMap {
    let mut fragments = CodeFragmentsMap::new();
    fragments.insert(Marker::for_path(path, name), vec![code]);
    fragments
}

// ── config/default ───────────────────────────────────────────────────────────

/// Top-level kustomization; `prefix` names the namespace and resources.
#[derive(Debug, Default, Serialize)]
pub struct DefaultKustomization {
    #[serde(flatten)]
    ctx: TemplateContext,
    prefix: String,
    bases_marker: String,
}

impl DefaultKustomization {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            bases_marker: Marker::for_path(DEFAULT_KUSTOMIZATION_PATH, markers::BASES).to_string(),
            ..Self::default()
        }
    }
}

builder!(DefaultKustomization, []);

impl Template for DefaultKustomization {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: DEFAULT_KUSTOMIZATION_PATH.into(),
            body: TemplateBody::Parameterized(DEFAULT_KUSTOMIZATION),
            if_exists: IfExistsAction::Error,
        }
    }
}

const DEFAULT_KUSTOMIZATION: &str = r#"# Adds namespace to all resources.
namespace: {{ prefix }}-system

# Value of this field is prepended to the
# names of all resources, e.g. a deployment named
# "wordpress" becomes "alices-wordpress".
# Note that it should also match with the prefix (text before '-') of the namespace
# field above.
namePrefix: {{ prefix }}-

bases:
- ../manager
{{ bases_marker }}
# [WEBHOOK] To enable webhook, uncomment all the sections with [WEBHOOK] prefix including the one in
# crd/kustomization.yaml
#- ../webhook
# [CERTMANAGER] To enable cert-manager, uncomment all sections with 'CERTMANAGER'. 'WEBHOOK' components are required.
#- ../certmanager
# [PROMETHEUS] To enable prometheus monitor, uncomment all sections with 'PROMETHEUS'.
#- ../prometheus
"#;

/// Adds the `crd`, `rbac` and `webhook` bases once they exist.
#[derive(Debug, Default)]
pub struct DefaultKustomizeUpdater {
    pub(crate) ctx: TemplateContext,
    pub crd: bool,
    pub rbac: bool,
    pub webhook: bool,
}

builder!(DefaultKustomizeUpdater, []);

impl Inserter for DefaultKustomizeUpdater {
    fn path(&self) -> String {
        DEFAULT_KUSTOMIZATION_PATH.into()
    }

    fn markers(&self) -> Vec<Marker> {
        vec![Marker::for_path(DEFAULT_KUSTOMIZATION_PATH, markers::BASES)]
    }

    fn code_fragments(&self) -> CodeFragmentsMap {
        let bases: Vec<String> = [
            (self.crd, "- ../crd"),
            (self.rbac, "- ../rbac"),
            (self.webhook, "- ../webhook"),
        ]
        .into_iter()
        .filter(|(wanted, _)| *wanted)
        .map(|(_, line)| line.to_string())
        .collect();

        let mut fragments = CodeFragmentsMap::new();
        if !bases.is_empty() {
            fragments.insert(
                Marker::for_path(DEFAULT_KUSTOMIZATION_PATH, markers::BASES),
                bases,
            );
        }
        fragments
    }
}

// ── config/manager ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct ManagerConfig {
    #[serde(flatten)]
    ctx: TemplateContext,
    image: String,
}

impl ManagerConfig {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

builder!(ManagerConfig, []);

impl Template for ManagerConfig {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/manager/manager.yaml".into(),
            body: TemplateBody::Parameterized(MANAGER),
            if_exists: IfExistsAction::Error,
        }
    }
}

const MANAGER: &str = r#"apiVersion: v1
kind: Namespace
metadata:
  labels:
    control-plane: controller-manager
  name: system
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: controller-manager
  namespace: system
  labels:
    control-plane: controller-manager
spec:
  selector:
    matchLabels:
      control-plane: controller-manager
  replicas: 1
  template:
    metadata:
      labels:
        control-plane: controller-manager
    spec:
      containers:
      - command:
        - /manager
        args:
        - --enable-leader-election
        image: {{ image }}
        name: manager
        resources:
          limits:
            cpu: 100m
            memory: 30Mi
          requests:
            cpu: 100m
            memory: 20Mi
      terminationGracePeriodSeconds: 10
"#;

#[derive(Debug, Default, Serialize)]
pub struct ManagerKustomization {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(ManagerKustomization, []);

impl Template for ManagerKustomization {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/manager/kustomization.yaml".into(),
            body: TemplateBody::Literal("resources:\n- manager.yaml\n".into()),
            if_exists: IfExistsAction::Error,
        }
    }
}

// ── config/rbac ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct RbacKustomization {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(RbacKustomization, []);

impl Template for RbacKustomization {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/rbac/kustomization.yaml".into(),
            body: TemplateBody::Literal(RBAC_KUSTOMIZATION.into()),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const RBAC_KUSTOMIZATION: &str = "resources:
- role.yaml
- role_binding.yaml
- leader_election_role.yaml
- leader_election_role_binding.yaml
";

#[derive(Debug, Default, Serialize)]
pub struct RoleBinding {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(RoleBinding, []);

impl Template for RoleBinding {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/rbac/role_binding.yaml".into(),
            body: TemplateBody::Literal(ROLE_BINDING.into()),
            if_exists: IfExistsAction::Error,
        }
    }
}

const ROLE_BINDING: &str = "apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: manager-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: manager-role
subjects:
- kind: ServiceAccount
  name: default
  namespace: system
";

/// Leader election role and its binding, one file each.
#[derive(Debug, Default, Serialize)]
pub struct LeaderElectionRole {
    #[serde(flatten)]
    ctx: TemplateContext,
    #[serde(skip)]
    binding: bool,
}

impl LeaderElectionRole {
    pub fn role() -> Self {
        Self::default()
    }

    pub fn binding() -> Self {
        Self {
            binding: true,
            ..Self::default()
        }
    }
}

builder!(LeaderElectionRole, []);

impl Template for LeaderElectionRole {
    fn spec(&self) -> TemplateSpec {
        let (path, body) = if self.binding {
            (
                "config/rbac/leader_election_role_binding.yaml",
                LEADER_ELECTION_ROLE_BINDING,
            )
        } else {
            ("config/rbac/leader_election_role.yaml", LEADER_ELECTION_ROLE)
        };
        TemplateSpec {
            path: path.into(),
            body: TemplateBody::Literal(body.into()),
            if_exists: IfExistsAction::Error,
        }
    }
}

const LEADER_ELECTION_ROLE: &str = "# permissions to do leader election.
apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: leader-election-role
rules:
- apiGroups:
  - \"\"
  resources:
  - configmaps
  verbs:
  - get
  - list
  - watch
  - create
  - update
  - patch
  - delete
- apiGroups:
  - \"\"
  resources:
  - configmaps/status
  verbs:
  - get
  - update
  - patch
- apiGroups:
  - \"\"
  resources:
  - events
  verbs:
  - create
";

const LEADER_ELECTION_ROLE_BINDING: &str = "apiVersion: rbac.authorization.k8s.io/v1
kind: RoleBinding
metadata:
  name: leader-election-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: Role
  name: leader-election-role
subjects:
- kind: ServiceAccount
  name: default
  namespace: system
";

/// Editor or viewer ClusterRole for a kind.
#[derive(Debug, Default, Serialize)]
pub struct CrdRole {
    #[serde(flatten)]
    ctx: TemplateContext,
    #[serde(skip)]
    editor: bool,
}

impl CrdRole {
    pub fn editor() -> Self {
        Self {
            editor: true,
            ..Self::default()
        }
    }

    pub fn viewer() -> Self {
        Self::default()
    }
}

builder!(CrdRole, [Resource]);

impl Template for CrdRole {
    fn spec(&self) -> TemplateSpec {
        let (path, body) = if self.editor {
            ("config/rbac/%[kind]_editor_role.yaml", CRD_EDITOR_ROLE)
        } else {
            ("config/rbac/%[kind]_viewer_role.yaml", CRD_VIEWER_ROLE)
        };
        TemplateSpec {
            path: path.into(),
            body: TemplateBody::Parameterized(body),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const CRD_EDITOR_ROLE: &str = r#"# permissions for end users to edit {{ resource.plural }}.
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: {{ resource.kind | lower }}-editor-role
rules:
- apiGroups:
  - {{ resource.domain }}
  resources:
  - {{ resource.plural }}
  verbs:
  - create
  - delete
  - get
  - list
  - patch
  - update
  - watch
- apiGroups:
  - {{ resource.domain }}
  resources:
  - {{ resource.plural }}/status
  verbs:
  - get
"#;

const CRD_VIEWER_ROLE: &str = r#"# permissions for end users to view {{ resource.plural }}.
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: {{ resource.kind | lower }}-viewer-role
rules:
- apiGroups:
  - {{ resource.domain }}
  resources:
  - {{ resource.plural }}
  verbs:
  - get
  - list
  - watch
- apiGroups:
  - {{ resource.domain }}
  resources:
  - {{ resource.plural }}/status
  verbs:
  - get
"#;

// ── config/crd ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct CrdKustomization {
    #[serde(flatten)]
    ctx: TemplateContext,
    resource_marker: String,
    webhook_patch_marker: String,
}

impl CrdKustomization {
    pub fn new() -> Self {
        Self {
            resource_marker: Marker::for_path(CRD_KUSTOMIZATION_PATH, markers::CRD_RESOURCE)
                .to_string(),
            webhook_patch_marker: Marker::for_path(
                CRD_KUSTOMIZATION_PATH,
                markers::CRD_WEBHOOK_PATCH,
            )
            .to_string(),
            ..Self::default()
        }
    }
}

builder!(CrdKustomization, []);

impl Template for CrdKustomization {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: CRD_KUSTOMIZATION_PATH.into(),
            body: TemplateBody::Parameterized(CRD_KUSTOMIZATION),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const CRD_KUSTOMIZATION: &str = r#"# This kustomization.yaml is not intended to be run by itself,
# since it depends on service name and namespace that are out of this kustomize package.
# It should be run by config/default
resources:
{{ resource_marker }}

patchesStrategicMerge:
# [WEBHOOK] To enable webhook, uncomment all the sections with [WEBHOOK] prefix.
# patches here are for enabling the conversion webhook for each CRD
{{ webhook_patch_marker }}

# the following config is for teaching kustomize how to do kustomization for CRDs.
configurations:
- kustomizeconfig.yaml
"#;

/// Lists a kind's CRD base and, for conversion webhooks, its patch.
#[derive(Debug, Default)]
pub struct CrdKustomizationUpdater {
    pub(crate) ctx: TemplateContext,
    pub resource: bool,
    pub conversion: bool,
}

builder!(CrdKustomizationUpdater, [Resource]);

impl Inserter for CrdKustomizationUpdater {
    fn path(&self) -> String {
        CRD_KUSTOMIZATION_PATH.into()
    }

    fn markers(&self) -> Vec<Marker> {
        [markers::CRD_RESOURCE, markers::CRD_WEBHOOK_PATCH]
            .into_iter()
            .map(|name| Marker::for_path(CRD_KUSTOMIZATION_PATH, name))
            .collect()
    }

    fn code_fragments(&self) -> CodeFragmentsMap {
        let Some(resource) = &self.ctx.resource else {
            return CodeFragmentsMap::new();
        };
        let mut fragments = CodeFragmentsMap::new();
        if self.resource {
            fragments.extend(single(
                CRD_KUSTOMIZATION_PATH,
                markers::CRD_RESOURCE,
                format!("- bases/{}_{}.yaml", resource.domain, resource.plural),
            ));
        }
        if self.conversion {
            fragments.extend(single(
                CRD_KUSTOMIZATION_PATH,
                markers::CRD_WEBHOOK_PATCH,
                format!("- patches/webhook_in_{}.yaml", resource.plural),
            ));
        }
        fragments
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CrdKustomizeConfig {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(CrdKustomizeConfig, []);

impl Template for CrdKustomizeConfig {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/crd/kustomizeconfig.yaml".into(),
            body: TemplateBody::Literal(CRD_KUSTOMIZE_CONFIG.into()),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const CRD_KUSTOMIZE_CONFIG: &str = "# This file is for teaching kustomize how to substitute name and namespace reference in CRD
nameReference:
- kind: Service
  version: v1
  fieldSpecs:
  - kind: CustomResourceDefinition
    group: apiextensions.k8s.io
    path: spec/conversion/webhookClientConfig/service/name

namespace:
- kind: CustomResourceDefinition
  group: apiextensions.k8s.io
  path: spec/conversion/webhookClientConfig/service/namespace
  create: false

varReference:
- path: metadata/annotations
";

/// Patch enabling the conversion webhook for one CRD.
#[derive(Debug, Default, Serialize)]
pub struct EnableWebhookPatch {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(EnableWebhookPatch, [Resource]);

impl Template for EnableWebhookPatch {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/crd/patches/webhook_in_%[plural].yaml".into(),
            body: TemplateBody::Parameterized(ENABLE_WEBHOOK_PATCH),
            if_exists: IfExistsAction::Error,
        }
    }
}

const ENABLE_WEBHOOK_PATCH: &str = r#"# The following patch enables conversion webhook for CRD
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: {{ resource.plural }}.{{ resource.domain }}
spec:
  conversion:
    strategy: Webhook
    webhookClientConfig:
      # this is "\n" used as a placeholder, otherwise it will be rejected by the apiserver for being blank,
      # but we're going to set it later using the cert-manager (or potentially a patch if not using cert-manager)
      caBundle: Cg==
      service:
        namespace: system
        name: webhook-service
        path: /convert
"#;

// ── config/webhook ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct WebhookKustomization {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(WebhookKustomization, []);

impl Template for WebhookKustomization {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/webhook/kustomization.yaml".into(),
            body: TemplateBody::Literal(
                "resources:\n- manifests.yaml\n- service.yaml\n\nconfigurations:\n- kustomizeconfig.yaml\n"
                    .into(),
            ),
            if_exists: IfExistsAction::Skip,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct WebhookService {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(WebhookService, []);

impl Template for WebhookService {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/webhook/service.yaml".into(),
            body: TemplateBody::Literal(WEBHOOK_SERVICE.into()),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const WEBHOOK_SERVICE: &str = "
apiVersion: v1
kind: Service
metadata:
  name: webhook-service
  namespace: system
spec:
  ports:
    - port: 443
      targetPort: 9443
  selector:
    control-plane: controller-manager
";

#[derive(Debug, Default, Serialize)]
pub struct WebhookKustomizeConfig {
    #[serde(flatten)]
    ctx: TemplateContext,
}

builder!(WebhookKustomizeConfig, []);

impl Template for WebhookKustomizeConfig {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: "config/webhook/kustomizeconfig.yaml".into(),
            body: TemplateBody::Literal(WEBHOOK_KUSTOMIZE_CONFIG.into()),
            if_exists: IfExistsAction::Skip,
        }
    }
}

const WEBHOOK_KUSTOMIZE_CONFIG: &str = "# the following config is for teaching kustomize where to look at when substituting vars.
# It requires kustomize v2.1.0 or newer to work properly.
nameReference:
- kind: Service
  version: v1
  fieldSpecs:
  - kind: MutatingWebhookConfiguration
    group: admissionregistration.k8s.io
    path: webhooks/clientConfig/service/name
  - kind: ValidatingWebhookConfiguration
    group: admissionregistration.k8s.io
    path: webhooks/clientConfig/service/name

namespace:
- kind: MutatingWebhookConfiguration
  group: admissionregistration.k8s.io
  path: webhooks/clientConfig/service/namespace
  create: true
- kind: ValidatingWebhookConfiguration
  group: admissionregistration.k8s.io
  path: webhooks/clientConfig/service/namespace
  create: true

varReference:
- path: metadata/annotations
";
