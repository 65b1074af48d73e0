//! End-to-end tests of the `kscaff` binary.

use std::{fs, path::PathBuf};

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch project directory named `operator` plus an isolated config file.
struct Sandbox {
    _root: TempDir,
    project: PathBuf,
    config: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let project = root.path().join("operator");
        fs::create_dir(&project).unwrap();
        let config = root.path().join("kscaff.toml");
        fs::write(&config, "[scaffold]\nrun_make = false\n").unwrap();
        Self {
            _root: root,
            project,
            config,
        }
    }

    fn kscaff(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("kscaff");
        cmd.current_dir(&self.project)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn init(&self) {
        self.kscaff()
            .args(["init", "--domain", "example.org", "--repo", "example.com/m", "--fetch-deps=false"])
            .assert()
            .success();
    }

    fn create_api(&self) -> assert_cmd::assert::Assert {
        self.kscaff()
            .args([
                "create", "api", "--group", "ship", "--version", "v1beta1", "--kind", "Frigate",
                "--resource", "--controller",
            ])
            .assert()
    }

    fn read(&self, path: &str) -> String {
        fs::read_to_string(self.project.join(path)).unwrap()
    }
}

#[test]
fn help_lists_subcommands() {
    cargo_bin_cmd!("kscaff")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn version_subcommand_prints_version() {
    Sandbox::new()
        .kscaff()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_color_accepts_any_non_empty_value() {
    for value in ["1", "yes", "true", ""] {
        Sandbox::new()
            .kscaff()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("kscaff version"));
    }
}

#[test]
fn init_writes_project_skeleton() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let project = sandbox.read("PROJECT");
    assert!(project.contains("domain: example.org"));
    assert!(project.contains("repo: example.com/m"));
    assert!(sandbox.read("go.mod").contains("module example.com/m"));
    assert!(sandbox.read("main.go").contains("// +kubebuilder:scaffold:imports"));
    assert!(sandbox.read("config/default/kustomization.yaml").contains("namePrefix: operator-"));
    assert!(sandbox.read("hack/boilerplate.go.txt").contains("Apache License"));
}

#[test]
fn init_twice_is_a_user_error() {
    let sandbox = Sandbox::new();
    sandbox.init();

    sandbox
        .kscaff()
        .args(["init", "--domain", "example.org", "--repo", "example.com/m", "--fetch-deps=false"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_rejects_invalid_domain() {
    let sandbox = Sandbox::new();
    sandbox
        .kscaff()
        .args(["init", "--domain", "Example_Org", "--repo", "example.com/m", "--fetch-deps=false"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("domain"));
    assert!(!sandbox.project.join("PROJECT").exists());
}

#[test]
fn create_api_before_init_is_not_found() {
    Sandbox::new()
        .create_api()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("kscaff init"));
}

#[test]
fn create_api_scaffolds_and_rejects_a_second_run() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.create_api().success();

    assert!(sandbox.read("api/v1beta1/frigate_types.go").contains("type FrigateSpec struct {"));
    assert!(sandbox.read("controllers/frigate_controller.go").contains("type FrigateReconciler struct {"));
    assert!(sandbox.read("main.go").contains("utilruntime.Must(shipv1beta1.AddToScheme(scheme))"));
    assert!(sandbox.read("PROJECT").contains("kind: Frigate"));

    let main_before = sandbox.read("main.go");
    sandbox
        .create_api()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(sandbox.read("main.go"), main_before);
}

#[test]
fn create_api_rejects_unknown_pattern() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox
        .kscaff()
        .args([
            "create", "api", "--group", "ship", "--version", "v1", "--kind", "Frigate",
            "--resource", "--controller", "--pattern", "helm",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown pattern"));
}

#[test]
fn create_webhook_after_api() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.create_api().success();

    sandbox
        .kscaff()
        .args([
            "create", "webhook", "--group", "ship", "--version", "v1beta1", "--kind", "Frigate",
            "--defaulting",
        ])
        .assert()
        .success();

    assert!(sandbox.project.join("api/v1beta1/frigate_webhook.go").exists());
    assert!(sandbox.project.join("config/webhook/service.yaml").exists());
}

#[test]
fn create_webhook_needs_a_webhook_kind() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.create_api().success();

    sandbox
        .kscaff()
        .args(["create", "webhook", "--group", "ship", "--version", "v1beta1", "--kind", "Frigate"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--defaulting"));
}

#[test]
fn edit_toggles_multigroup() {
    let sandbox = Sandbox::new();
    sandbox.init();

    sandbox.kscaff().args(["edit", "--multigroup=true"]).assert().success();
    assert!(sandbox.read("PROJECT").contains("multigroup: true"));
    assert!(sandbox.read("Dockerfile").contains("COPY apis/ apis/"));
}

#[test]
fn completion_generates_a_script() {
    cargo_bin_cmd!("kscaff")
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kscaff"));
}

#[test]
fn config_init_then_show() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("nested").join("config.toml");

    cargo_bin_cmd!("kscaff")
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("domain = \"my.domain\""));

    cargo_bin_cmd!("kscaff")
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run_make = true"));
}

#[test]
fn unreadable_config_is_a_configuration_error() {
    let root = TempDir::new().unwrap();
    cargo_bin_cmd!("kscaff")
        .arg("--config")
        .arg(root.path().join("absent.toml"))
        .arg("version")
        .assert()
        .failure()
        .code(4);
}
