//! A single project's node in the dependency graph

use crate::framework::Framework;
use crate::model::include_flags::LibraryIncludeFlags;
use crate::version::VersionRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a project consumes packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStyle {
    #[default]
    Unknown,
    PackageReference,
    PackagesConfig,
    DotnetCliTool,
    Standalone,
}

/// What kind of library a dependency resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencyTarget {
    #[default]
    Package,
    Project,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDependency {
    pub name: String,
    pub version_range: VersionRange,
    #[serde(default)]
    pub target: DependencyTarget,
    #[serde(default)]
    pub include_type: LibraryIncludeFlags,
    #[serde(default = "default_suppress_parent")]
    pub suppress_parent: LibraryIncludeFlags,
    #[serde(default)]
    pub auto_referenced: bool,
}

fn default_suppress_parent() -> LibraryIncludeFlags {
    LibraryIncludeFlags::DEFAULT_SUPPRESS_PARENT
}

impl LibraryDependency {
    /// A plain package reference with default asset flags
    pub fn package(name: impl Into<String>, version_range: VersionRange) -> Self {
        Self {
            name: name.into(),
            version_range,
            target: DependencyTarget::Package,
            include_type: LibraryIncludeFlags::ALL,
            suppress_parent: LibraryIncludeFlags::DEFAULT_SUPPRESS_PARENT,
            auto_referenced: false,
        }
    }
}

/// Package dependencies declared for one target framework
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFrameworkInformation {
    pub framework: Framework,
    /// The alias the project file uses for this framework (`TargetFrameworks` entry)
    #[serde(default)]
    pub target_alias: String,
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
}

/// A cross-project reference edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRestoreReference {
    pub project_unique_name: String,
    pub project_path: PathBuf,
}

impl ProjectRestoreReference {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        Self {
            project_unique_name: project_path.to_string_lossy().into_owned(),
            project_path,
        }
    }
}

/// Project references for one target framework
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRestoreMetadataFrameworkInfo {
    pub framework: Framework,
    #[serde(default)]
    pub target_alias: String,
    #[serde(default)]
    pub project_references: Vec<ProjectRestoreReference>,
}

/// A package source as declared on a project or in settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSource {
    /// Feed URL or local folder
    pub source: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PackageSource {
    /// A source whose name is its location
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: source.clone(),
            source,
            is_enabled: true,
        }
    }

    pub fn named(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            is_enabled: true,
        }
    }

    /// Whether the location is a remote feed rather than a local folder
    pub fn is_http(&self) -> bool {
        let lower = self.source.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

/// Restore inputs and outputs for one project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRestoreMetadata {
    pub project_unique_name: String,
    pub project_name: String,
    pub project_path: PathBuf,
    #[serde(default)]
    pub project_style: ProjectStyle,
    /// Directory the restore writes its outputs to (usually `obj/`)
    pub output_path: PathBuf,
    /// Declared global packages folder; `None` defers to settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages_path: Option<String>,
    #[serde(default)]
    pub sources: Vec<PackageSource>,
    #[serde(default)]
    pub fallback_folders: Vec<String>,
    #[serde(default)]
    pub config_file_paths: Vec<PathBuf>,
    #[serde(default)]
    pub target_frameworks: Vec<ProjectRestoreMetadataFrameworkInfo>,
}

/// The dependency graph node for one project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub target_frameworks: Vec<TargetFrameworkInformation>,
    pub restore_metadata: ProjectRestoreMetadata,
}

impl PackageSpec {
    /// Minimal package-reference node for the project at `project_path`
    pub fn new(project_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let name = project_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name: name.clone(),
            version: None,
            target_frameworks: Vec::new(),
            restore_metadata: ProjectRestoreMetadata {
                project_unique_name: project_path.to_string_lossy().into_owned(),
                project_name: name,
                project_path,
                project_style: ProjectStyle::PackageReference,
                output_path: output_path.into(),
                packages_path: None,
                sources: Vec::new(),
                fallback_folders: Vec::new(),
                config_file_paths: Vec::new(),
                target_frameworks: Vec::new(),
            },
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.restore_metadata.project_unique_name
    }

    pub fn project_path(&self) -> &Path {
        &self.restore_metadata.project_path
    }

    /// Directory containing the project file, used to resolve relative settings
    pub fn project_directory(&self) -> &Path {
        self.restore_metadata
            .project_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
    }

    pub fn output_path(&self) -> &Path {
        &self.restore_metadata.output_path
    }
}
