//! Domain behaviour through the public API only.

use kscaff_core::domain::{
    CodeFragmentsMap, DomainError, GroupVersionKind, Marker, ProjectConfig, ProjectVersion,
    ResourceOptions, filter_existing, insert_fragments,
};

fn project() -> ProjectConfig {
    let mut config = ProjectConfig::new(ProjectVersion::V2);
    config.domain = "example.org".into();
    config.repo = "example.com/m".into();
    config
}

#[test]
fn template_paths_resolve_from_the_resource() {
    let resource = ResourceOptions::new("crew", "v1", "FirstMate").new_resource(&project(), true);

    assert_eq!(
        resource.replace_path("api/%[version]/%[kind]_types.go"),
        "api/v1/firstmate_types.go"
    );
    assert_eq!(resource.domain, "crew.example.org");
    assert_eq!(resource.package, "example.com/m/api/v1");
    assert_eq!(resource.import_alias, "crewv1");
}

#[test]
fn multigroup_projects_nest_packages_by_group() {
    let mut config = project();
    config.multigroup = true;
    let resource = ResourceOptions::new("ship", "v1beta1", "Frigate").new_resource(&config, true);
    assert_eq!(resource.package, "example.com/m/apis/ship/v1beta1");
}

#[test]
fn controller_for_builtin_group_uses_upstream_package() {
    let resource = ResourceOptions::new("apps", "v1", "Deployment").new_resource(&project(), false);
    assert_eq!(resource.package, "k8s.io/api/apps/v1");

    let scaffolded = ResourceOptions::new("apps", "v1", "Deployment").new_resource(&project(), true);
    assert_eq!(scaffolded.package, "example.com/m/api/v1");
}

#[test]
fn second_insertion_of_the_same_fragments_is_a_no_op() {
    let marker = Marker::for_path("main.go", "imports");
    let content = format!("import (\n\t\"fmt\"\n\t{marker}\n)\n");
    let mut fragments = CodeFragmentsMap::new();
    fragments.insert(marker.clone(), vec!["shipv1 \"example.com/m/api/v1\"\n".into()]);

    let once = insert_fragments(&content, &filter_existing(&content, fragments.clone()));
    assert!(once.contains("\tshipv1 \"example.com/m/api/v1\"\n\t// +kubebuilder:scaffold:imports\n"));

    let remaining = filter_existing(&once, fragments);
    assert!(remaining.is_empty());
    assert_eq!(insert_fragments(&once, &remaining), once);
}

#[test]
fn yaml_markers_use_hash_comments() {
    assert_eq!(
        Marker::for_path("config/default/kustomization.yaml", "bases").to_string(),
        "# +kubebuilder:scaffold:bases"
    );
}

#[test]
fn resources_are_unique_and_single_group_by_default() {
    let mut config = project();
    let frigate = GroupVersionKind::new("ship", "v1beta1", "Frigate");
    config.add_resource(frigate.clone()).unwrap();

    assert!(matches!(
        config.add_resource(frigate.clone()),
        Err(DomainError::ResourceAlreadyTracked { .. })
    ));
    assert!(config.check_new_resource(&frigate, true).is_ok());
    assert!(
        config
            .check_new_resource(&GroupVersionKind::new("ship", "v1", "Destroyer"), false)
            .is_ok()
    );
    assert_eq!(
        config.check_new_resource(&GroupVersionKind::new("sea", "v1", "Captain"), false),
        Err(DomainError::MultipleGroupsNotAllowed {
            group: "sea".into()
        })
    );
}

#[test]
fn v2_projects_reject_newer_fields() {
    let mut config = project();
    assert!(config.validate().is_ok());

    config.project_name = "m".into();
    assert!(matches!(
        config.validate(),
        Err(DomainError::UnsupportedField {
            field: "projectName",
            ..
        })
    ));

    config.version = ProjectVersion::V3Alpha;
    assert!(config.validate().is_ok());
}
