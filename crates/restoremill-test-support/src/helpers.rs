//! Test helper functions for building specs and settings

use restoremill_config::RestoreSettings;
use restoremill_foundation::{
    DependencyGraphSpec, Framework, LibraryDependency, PackageSource, PackageSpec,
    ProjectRestoreMetadataFrameworkInfo, TargetFrameworkInformation, VersionRange,
};
use std::path::{Path, PathBuf};

/// Create a package-reference node for `project_path` writing to `output_path`
pub fn create_test_spec(
    project_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> PackageSpec {
    PackageSpec::new(project_path.as_ref(), output_path.as_ref())
}

/// Create a snapshot whose restore root is `root`, followed by `others`
pub fn create_test_graph(root: PackageSpec, others: Vec<PackageSpec>) -> DependencyGraphSpec {
    others
        .into_iter()
        .fold(DependencyGraphSpec::new().with_restore_root(root), |graph, spec| {
            graph.with_project(spec)
        })
}

/// Settings with a fixed packages folder and two sources, independent of the host
pub fn create_test_settings() -> RestoreSettings {
    RestoreSettings {
        global_packages_folder: Some(PathBuf::from("/test/.nuget/packages")),
        fallback_folders: vec!["/test/fallback".to_string()],
        sources: vec![
            PackageSource::named("nuget.org", "https://api.nuget.org/v3/index.json"),
            PackageSource::named("test-feed", "https://feed.test/v3/index.json"),
        ],
        config_file_paths: vec![PathBuf::from("/test/restoremill.toml")],
        ..Default::default()
    }
}

/// A package dependency at `[version, )`
pub fn package_dependency(name: &str, version: &str) -> LibraryDependency {
    let range = VersionRange::at_least(version)
        .unwrap_or_else(|e| panic!("invalid test version '{}': {}", version, e));
    LibraryDependency::package(name, range)
}

/// Add a target framework with dependencies and project references to `spec`
pub fn with_framework(
    mut spec: PackageSpec,
    alias: &str,
    dependencies: Vec<LibraryDependency>,
    project_references: Vec<PathBuf>,
) -> PackageSpec {
    let framework = Framework::parse(alias);
    spec.target_frameworks.push(TargetFrameworkInformation {
        framework: framework.clone(),
        target_alias: alias.to_string(),
        dependencies,
    });
    spec.restore_metadata
        .target_frameworks
        .push(ProjectRestoreMetadataFrameworkInfo {
            framework,
            target_alias: alias.to_string(),
            project_references: project_references
                .into_iter()
                .map(restoremill_foundation::ProjectRestoreReference::new)
                .collect(),
        });
    spec
}
