//! Point-in-time description of a project closure

use crate::error::RestoreResult;
use crate::model::package_spec::PackageSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A collection of package specs describing a project closure
///
/// Equality is value equality over the restore list and the projects, in
/// order. Staleness checks rely on this: two snapshots produced by separate
/// evaluations compare equal when their contents do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraphSpec {
    /// Unique names of the projects to restore
    #[serde(default)]
    restore: Vec<String>,
    #[serde(default)]
    projects: Vec<PackageSpec>,
}

impl DependencyGraphSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project node. A node with the same unique name is kept (first one wins).
    pub fn add_project(&mut self, spec: PackageSpec) {
        if self.get_project_spec(spec.unique_name()).is_none() {
            self.projects.push(spec);
        }
    }

    /// Mark a project as a restore root
    pub fn add_restore(&mut self, unique_name: impl Into<String>) {
        let unique_name = unique_name.into();
        if !self
            .restore
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&unique_name))
        {
            self.restore.push(unique_name);
        }
    }

    /// Builder form of `add_project` + `add_restore`
    pub fn with_restore_root(mut self, spec: PackageSpec) -> Self {
        self.add_restore(spec.unique_name().to_string());
        self.add_project(spec);
        self
    }

    pub fn with_project(mut self, spec: PackageSpec) -> Self {
        self.add_project(spec);
        self
    }

    /// Look up a node by unique name (case-insensitive, like project paths on Windows)
    pub fn get_project_spec(&self, unique_name: &str) -> Option<&PackageSpec> {
        self.projects
            .iter()
            .find(|p| p.unique_name().eq_ignore_ascii_case(unique_name))
    }

    /// Nodes in insertion order
    pub fn projects(&self) -> &[PackageSpec] {
        &self.projects
    }

    pub fn restore(&self) -> &[String] {
        &self.restore
    }

    pub fn from_json(json: &str) -> RestoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> RestoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a dgspec file written by `save`
    pub fn load(path: &Path) -> RestoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            projects = spec.projects.len(),
            "Loaded dependency graph spec"
        );
        Ok(spec)
    }

    /// Write the spec as pretty JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> RestoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
