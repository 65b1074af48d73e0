//! End-to-end scaffolding against the in-memory filesystem.

use std::sync::{Arc, Mutex};

use kscaff_adapters::{
    MemoryFilesystem, TeraRenderer, YamlConfigStore, plugins,
    scaffolds::{
        ApiOptions, ApiScaffolder, EditScaffolder, InitOptions, InitScaffolder, UpdateScaffolder,
        WebhookOptions, WebhookScaffolder,
    },
};
use kscaff_core::{
    application::{CommandService, ScaffoldService, ports::CommandRunner},
    domain::{DomainError, ProjectConfig, ProjectVersion, ResourceOptions},
    error::{KscaffError, KscaffResult},
};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn commands(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl CommandRunner for Recorder {
    fn run(&self, program: &str, args: &[&str]) -> KscaffResult<()> {
        self.0.lock().unwrap().push(format!("{program} {}", args.join(" ")));
        Ok(())
    }
}

fn service(fs: &MemoryFilesystem, runner: &Recorder, pattern: Option<&str>) -> CommandService {
    let mut engine = ScaffoldService::new(Box::new(fs.clone()), Box::new(TeraRenderer::new()));
    for plugin in plugins::for_pattern(pattern).unwrap() {
        engine = engine.with_plugin(plugin);
    }
    CommandService::new(
        Box::new(YamlConfigStore::new(Box::new(fs.clone()))),
        Box::new(runner.clone()),
        engine,
    )
}

fn init_options() -> InitOptions {
    InitOptions {
        domain: "example.org".into(),
        repo: Some("example.com/m".into()),
        fetch_deps: false,
        ..InitOptions::default()
    }
}

fn initialized() -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    let mut init = InitScaffolder::new(init_options(), &fs, "m").unwrap().with_year(2026);
    service(&fs, &Recorder::default(), None)
        .init(&mut init, ProjectConfig::new(ProjectVersion::V2))
        .unwrap();
    fs
}

fn frigate() -> ApiOptions {
    ApiOptions {
        run_make: false,
        ..ApiOptions::new(ResourceOptions::new("ship", "v1beta1", "Frigate"))
    }
}

fn read(fs: &MemoryFilesystem, path: &str) -> String {
    fs.read_file(path)
        .unwrap_or_else(|| panic!("{path} was not written"))
}

fn snapshot(fs: &MemoryFilesystem) -> Vec<(String, String)> {
    fs.list_files()
        .into_iter()
        .map(|path| {
            let contents = fs.read_file(&path).unwrap_or_default();
            (path.display().to_string(), contents)
        })
        .collect()
}

#[test]
fn init_writes_project_skeleton() {
    let fs = initialized();

    assert!(read(&fs, "hack/boilerplate.go.txt").starts_with("/*\nCopyright 2026.\n\nLicensed under the Apache License"));
    assert!(read(&fs, "go.mod").starts_with("module example.com/m\n"));

    let main = read(&fs, "main.go");
    assert!(main.starts_with("/*\nCopyright 2026."));
    for marker in ["imports", "scheme", "builder"] {
        assert!(main.contains(&format!("// +kubebuilder:scaffold:{marker}")));
    }
    assert!(main.contains(".example.org\","));

    let kustomization = read(&fs, "config/default/kustomization.yaml");
    assert!(kustomization.contains("namespace: m-system\n"));
    assert!(kustomization.contains("namePrefix: m-\n"));
    assert!(kustomization.contains("- ../manager\n# +kubebuilder:scaffold:bases\n"));

    for path in [
        "Makefile",
        "Dockerfile",
        ".gitignore",
        "config/manager/manager.yaml",
        "config/manager/kustomization.yaml",
        "config/rbac/kustomization.yaml",
        "config/rbac/role_binding.yaml",
        "config/rbac/leader_election_role.yaml",
        "config/rbac/leader_election_role_binding.yaml",
    ] {
        assert!(fs.read_file(path).is_some(), "{path} missing");
    }

    let project = read(&fs, "PROJECT");
    assert!(project.contains("domain: example.org"));
    assert!(project.contains("repo: example.com/m"));
}

#[test]
fn init_twice_is_rejected() {
    let fs = initialized();
    let before = snapshot(&fs);

    let mut init = InitScaffolder::new(init_options(), &fs, "m").unwrap();
    let err = service(&fs, &Recorder::default(), None)
        .init(&mut init, ProjectConfig::new(ProjectVersion::V2))
        .unwrap_err();

    assert!(matches!(err, KscaffError::Domain(DomainError::ProjectAlreadyInitialized)));
    assert_eq!(snapshot(&fs), before);
}

#[test]
fn init_validation_failure_writes_nothing() {
    let fs = MemoryFilesystem::new();
    let options = InitOptions {
        domain: "Example.org".into(),
        ..init_options()
    };
    let mut init = InitScaffolder::new(options, &fs, "m").unwrap();

    let err = service(&fs, &Recorder::default(), None)
        .init(&mut init, ProjectConfig::new(ProjectVersion::V2))
        .unwrap_err();

    assert!(matches!(err, KscaffError::Domain(DomainError::InvalidDomain { .. })));
    assert!(fs.list_files().is_empty());
}

#[test]
fn init_runs_go_mod_tidy_when_fetching_deps() {
    let fs = MemoryFilesystem::new();
    let runner = Recorder::default();
    let options = InitOptions {
        fetch_deps: true,
        ..init_options()
    };
    let mut init = InitScaffolder::new(options, &fs, "m").unwrap();

    let outcome = service(&fs, &runner, None)
        .init(&mut init, ProjectConfig::new(ProjectVersion::V2))
        .unwrap();

    assert!(outcome.post_scaffold_error.is_none());
    assert_eq!(runner.commands(), vec!["go mod tidy".to_string()]);
}

#[test]
fn create_api_scaffolds_and_wires_a_kind() {
    let fs = initialized();
    let outcome = service(&fs, &Recorder::default(), None)
        .run(&mut ApiScaffolder::new(frigate()))
        .unwrap();
    assert_eq!(outcome.config.resources.len(), 1);

    let types = read(&fs, "api/v1beta1/frigate_types.go");
    assert!(types.starts_with("/*\nCopyright 2026."));
    assert!(types.contains("package v1beta1\n"));
    assert!(types.contains("type FrigateSpec struct {"));
    assert!(types.contains("SchemeBuilder.Register(&Frigate{}, &FrigateList{})"));
    assert!(!types.contains("scope=Cluster"));

    let group = read(&fs, "api/v1beta1/groupversion_info.go");
    assert!(group.contains("// +groupName=ship.example.org\n"));

    assert!(read(&fs, "config/samples/ship_v1beta1_frigate.yaml").contains("kind: Frigate\n"));
    assert!(read(&fs, "config/rbac/frigate_editor_role.yaml").contains("  - frigates\n"));
    assert!(fs.read_file("config/rbac/frigate_viewer_role.yaml").is_some());
    assert!(fs.read_file("config/crd/kustomizeconfig.yaml").is_some());

    let crd = read(&fs, "config/crd/kustomization.yaml");
    assert!(crd.contains(
        "- bases/ship.example.org_frigates.yaml\n# +kubebuilder:scaffold:crdkustomizeresource\n"
    ));

    let controller = read(&fs, "controllers/frigate_controller.go");
    assert!(controller.contains("package controllers\n"));
    assert!(controller.contains("shipv1beta1 \"example.com/m/api/v1beta1\""));
    assert!(controller.contains("type FrigateReconciler struct {"));

    let suite = read(&fs, "controllers/suite_test.go");
    assert!(suite.contains("err = shipv1beta1.AddToScheme(scheme.Scheme)"));
    assert!(suite.contains("// +kubebuilder:scaffold:scheme"));

    let main = read(&fs, "main.go");
    assert!(main.contains("\tshipv1beta1 \"example.com/m/api/v1beta1\"\n"));
    assert!(main.contains("\t\"example.com/m/controllers\"\n"));
    assert!(main.contains("utilruntime.Must(shipv1beta1.AddToScheme(scheme))"));
    assert!(main.contains("if err = (&controllers.FrigateReconciler{"));

    let kustomization = read(&fs, "config/default/kustomization.yaml");
    assert!(kustomization.contains("- ../manager\n- ../crd\n- ../rbac\n# +kubebuilder:scaffold:bases\n"));

    let project = read(&fs, "PROJECT");
    assert!(project.contains("group: ship"));
    assert!(project.contains("kind: Frigate"));
}

#[test]
fn create_api_twice_fails_validation_and_writes_nothing() {
    let fs = initialized();
    let service = service(&fs, &Recorder::default(), None);
    service.run(&mut ApiScaffolder::new(frigate())).unwrap();
    let before = snapshot(&fs);

    let err = service.run(&mut ApiScaffolder::new(frigate())).unwrap_err();

    assert!(matches!(err, KscaffError::Domain(DomainError::ResourceAlreadyTracked { .. })));
    assert_eq!(snapshot(&fs), before);
}

#[test]
fn forced_rerun_does_not_duplicate_insertions() {
    let fs = initialized();
    let service = service(&fs, &Recorder::default(), None);
    service.run(&mut ApiScaffolder::new(frigate())).unwrap();

    let forced = ApiOptions {
        force: true,
        ..frigate()
    };
    let outcome = service.run(&mut ApiScaffolder::new(forced)).unwrap();
    assert_eq!(outcome.config.resources.len(), 1);

    let main = read(&fs, "main.go");
    assert_eq!(main.matches("shipv1beta1 \"example.com/m/api/v1beta1\"").count(), 1);
    assert_eq!(main.matches("FrigateReconciler{").count(), 1);
    let crd = read(&fs, "config/crd/kustomization.yaml");
    assert_eq!(crd.matches("- bases/ship.example.org_frigates.yaml").count(), 1);
    let kustomization = read(&fs, "config/default/kustomization.yaml");
    assert_eq!(kustomization.matches("- ../rbac").count(), 1);
}

#[test]
fn second_group_requires_multigroup() {
    let fs = initialized();
    let service = service(&fs, &Recorder::default(), None);
    service.run(&mut ApiScaffolder::new(frigate())).unwrap();

    let kraken = ApiOptions {
        run_make: false,
        ..ApiOptions::new(ResourceOptions::new("sea", "v1", "Kraken"))
    };
    let err = service.run(&mut ApiScaffolder::new(kraken.clone())).unwrap_err();
    assert!(matches!(err, KscaffError::Domain(DomainError::MultipleGroupsNotAllowed { .. })));

    service.run(&mut EditScaffolder::new(true)).unwrap();
    assert!(read(&fs, "Dockerfile").contains("COPY apis/ apis/\n"));
    assert!(read(&fs, "PROJECT").contains("multigroup: true"));

    service.run(&mut ApiScaffolder::new(kraken)).unwrap();
    assert!(fs.read_file("apis/sea/v1/kraken_types.go").is_some());
    assert!(read(&fs, "controllers/sea/kraken_controller.go").contains("package sea\n"));
    assert!(read(&fs, "main.go").contains("seacontroller \"example.com/m/controllers/sea\""));
}

#[test]
fn edit_switches_dockerfile_back() {
    let fs = initialized();
    let service = service(&fs, &Recorder::default(), None);

    service.run(&mut EditScaffolder::new(true)).unwrap();
    service.run(&mut EditScaffolder::new(false)).unwrap();

    let dockerfile = read(&fs, "Dockerfile");
    assert!(dockerfile.contains("COPY api/ api/\n"));
    assert!(!dockerfile.contains("COPY apis/"));
    assert!(!read(&fs, "PROJECT").contains("multigroup"));
}

#[test]
fn create_webhook_wires_defaulting_and_conversion() {
    let fs = initialized();
    let service = service(&fs, &Recorder::default(), None);
    service.run(&mut ApiScaffolder::new(frigate())).unwrap();

    let mut webhook = WebhookScaffolder::new(WebhookOptions {
        resource: ResourceOptions::new("ship", "v1beta1", "Frigate"),
        defaulting: true,
        validating: false,
        conversion: true,
    });
    service.run(&mut webhook).unwrap();

    let source = read(&fs, "api/v1beta1/frigate_webhook.go");
    assert!(source.contains("path=/mutate-ship-example-org-v1beta1-frigate,"));
    assert!(source.contains("func (r *Frigate) Default() {"));
    assert!(!source.contains("ValidateCreate"));

    let main = read(&fs, "main.go");
    assert!(main.contains("if err = (&shipv1beta1.Frigate{}).SetupWebhookWithManager(mgr); err != nil {"));
    assert_eq!(main.matches("shipv1beta1 \"example.com/m/api/v1beta1\"").count(), 1);

    assert!(fs.read_file("config/webhook/kustomization.yaml").is_some());
    assert!(fs.read_file("config/webhook/service.yaml").is_some());
    assert!(fs.read_file("config/webhook/kustomizeconfig.yaml").is_some());
    assert!(read(&fs, "config/crd/patches/webhook_in_frigates.yaml").contains("name: frigates.ship.example.org\n"));
    assert!(read(&fs, "config/crd/kustomization.yaml").contains(
        "- patches/webhook_in_frigates.yaml\n# +kubebuilder:scaffold:crdkustomizewebhookpatch\n"
    ));
    assert!(read(&fs, "config/default/kustomization.yaml").contains("- ../webhook\n"));
}

#[test]
fn create_webhook_for_unknown_kind_is_rejected() {
    let fs = initialized();
    let before = snapshot(&fs);

    let mut webhook = WebhookScaffolder::new(WebhookOptions {
        resource: ResourceOptions::new("ship", "v1beta1", "Frigate"),
        defaulting: true,
        validating: true,
        conversion: false,
    });
    let err = service(&fs, &Recorder::default(), None).run(&mut webhook).unwrap_err();

    assert!(matches!(err, KscaffError::Domain(DomainError::ResourceNotTracked { .. })));
    assert_eq!(snapshot(&fs), before);
}

#[test]
fn addon_pattern_swaps_types_and_controller() {
    let fs = initialized();
    let runner = Recorder::default();
    let options = ApiOptions {
        pattern: Some("addon".into()),
        ..frigate()
    };

    service(&fs, &runner, Some("addon"))
        .run(&mut ApiScaffolder::new(options))
        .unwrap();

    assert!(read(&fs, "api/v1beta1/frigate_types.go").contains("addonv1alpha1.CommonSpec"));
    assert!(read(&fs, "controllers/frigate_controller.go").contains("declarative.Reconciler"));
    assert!(fs.read_file("channels/packages/frigate/0.0.1/manifest.yaml").is_some());
    assert!(read(&fs, "channels/stable").contains("- version: 0.0.1\n"));
    assert_eq!(
        runner.commands(),
        vec![format!(
            "go get sigs.k8s.io/kubebuilder-declarative-pattern@{}",
            plugins::DECLARATIVE_PATTERN_VERSION
        )]
    );
}

#[test]
fn create_api_post_scaffold_runs_make() {
    let fs = initialized();
    let runner = Recorder::default();
    let options = ApiOptions {
        run_make: true,
        ..frigate()
    };

    service(&fs, &runner, None)
        .run(&mut ApiScaffolder::new(options))
        .unwrap();

    assert_eq!(
        runner.commands(),
        vec!["go mod tidy".to_string(), "make generate".to_string()]
    );
}

#[test]
fn update_only_tidies_modules() {
    let fs = initialized();
    let runner = Recorder::default();
    let before = snapshot(&fs);

    service(&fs, &runner, None)
        .run(&mut UpdateScaffolder)
        .unwrap();

    assert_eq!(runner.commands(), vec!["go mod tidy".to_string()]);
    assert_eq!(snapshot(&fs), before);
}
