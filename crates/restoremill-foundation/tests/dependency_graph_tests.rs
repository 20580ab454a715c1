//! Tests for the dependency graph model

use pretty_assertions::assert_eq;
use restoremill_foundation::{
    DependencyGraphSpec, Framework, LibraryDependency, PackageSource, PackageSpec,
    ProjectRestoreMetadataFrameworkInfo, ProjectRestoreReference, TargetFrameworkInformation,
};
use tempfile::TempDir;

fn sample_spec(project: &str) -> PackageSpec {
    let mut spec = PackageSpec::new(
        format!("/repo/{0}/{0}.csproj", project),
        format!("/repo/{}/obj", project),
    );
    spec.target_frameworks.push(TargetFrameworkInformation {
        framework: Framework::parse("net8.0"),
        target_alias: "net8.0".to_string(),
        dependencies: vec![LibraryDependency::package(
            "Newtonsoft.Json",
            "13.0.1".parse().unwrap(),
        )],
    });
    spec.restore_metadata.sources = vec![PackageSource::new("https://api.nuget.org/v3/index.json")];
    spec.restore_metadata
        .target_frameworks
        .push(ProjectRestoreMetadataFrameworkInfo {
            framework: Framework::parse("net8.0"),
            target_alias: "net8.0".to_string(),
            project_references: vec![ProjectRestoreReference::new("/repo/Lib/Lib.csproj")],
        });
    spec
}

#[test]
fn test_value_equality_between_separate_snapshots() {
    let first = DependencyGraphSpec::new().with_restore_root(sample_spec("App"));
    let second = DependencyGraphSpec::new().with_restore_root(sample_spec("App"));
    assert_eq!(first, second);

    let mut changed = sample_spec("App");
    changed.target_frameworks[0].dependencies[0].version_range = "13.0.3".parse().unwrap();
    let third = DependencyGraphSpec::new().with_restore_root(changed);
    assert_ne!(first, third);
}

#[test]
fn test_get_project_spec_is_case_insensitive() {
    let graph = DependencyGraphSpec::new().with_restore_root(sample_spec("App"));
    assert!(graph.get_project_spec("/repo/app/app.CSPROJ").is_some());
    assert!(graph.get_project_spec("/repo/Other/Other.csproj").is_none());
}

#[test]
fn test_add_project_keeps_first_node() {
    let mut graph = DependencyGraphSpec::new();
    graph.add_project(sample_spec("App"));
    let mut duplicate = sample_spec("App");
    duplicate.name = "Renamed".to_string();
    graph.add_project(duplicate);

    assert_eq!(graph.projects().len(), 1);
    assert_eq!(graph.projects()[0].name, "App");
}

#[test]
fn test_projects_preserve_insertion_order() {
    let graph = DependencyGraphSpec::new()
        .with_restore_root(sample_spec("Zeta"))
        .with_project(sample_spec("Alpha"));
    let names: Vec<&str> = graph.projects().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "Alpha"]);
    assert_eq!(graph.restore(), &["/repo/Zeta/Zeta.csproj".to_string()]);
}

#[test]
fn test_save_and_load_dgspec_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("App.dgspec.json");
    let graph = DependencyGraphSpec::new()
        .with_restore_root(sample_spec("App"))
        .with_project(sample_spec("Lib"));

    graph.save(&path).unwrap();
    let loaded = DependencyGraphSpec::load(&path).unwrap();
    assert_eq!(loaded, graph);
}

#[test]
fn test_from_json_uses_camel_case_fields() {
    let json = r#"{
        "restore": ["/repo/App/App.csproj"],
        "projects": [{
            "name": "App",
            "targetFrameworks": [{
                "framework": "net8.0",
                "dependencies": [{ "name": "Serilog", "versionRange": "[3.0, 4.0)" }]
            }],
            "restoreMetadata": {
                "projectUniqueName": "/repo/App/App.csproj",
                "projectName": "App",
                "projectPath": "/repo/App/App.csproj",
                "projectStyle": "PackageReference",
                "outputPath": "/repo/App/obj",
                "sources": [{ "source": "CLEAR" }]
            }
        }]
    }"#;

    let graph = DependencyGraphSpec::from_json(json).unwrap();
    let spec = graph.get_project_spec("/repo/App/App.csproj").unwrap();
    let dependency = &spec.target_frameworks[0].dependencies[0];
    assert_eq!(dependency.version_range.min_version(), Some("3.0.0"));
    assert_eq!(spec.restore_metadata.sources[0].source, "CLEAR");
    assert!(spec.restore_metadata.sources[0].is_enabled);
}

#[test]
fn test_malformed_json_is_reported() {
    let result = DependencyGraphSpec::from_json("{ not json");
    assert!(matches!(
        result,
        Err(restoremill_foundation::RestoreError::Json(_))
    ));
}
