use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Identifies one buildable project within a workspace
///
/// `full_path` is absolute and doubles as the restore-info cache key and the
/// unique name of the project's graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdentity {
    pub project_name: String,
    /// Display name that disambiguates same-named projects (e.g. `src\App`)
    pub unique_name: String,
    pub full_path: PathBuf,
    pub project_id: Uuid,
}

impl ProjectIdentity {
    pub fn new(
        project_name: impl Into<String>,
        unique_name: impl Into<String>,
        full_path: impl Into<PathBuf>,
        project_id: Uuid,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            unique_name: unique_name.into(),
            full_path: full_path.into(),
            project_id,
        }
    }

    /// Identity derived from the project file path alone, with a fresh id
    pub fn from_path(full_path: impl Into<PathBuf>) -> Self {
        let full_path = full_path.into();
        let project_name = full_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            unique_name: project_name.clone(),
            project_name,
            full_path,
            project_id: Uuid::new_v4(),
        }
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Unique name of this project's node inside a dependency graph spec
    pub fn spec_key(&self) -> String {
        self.full_path.to_string_lossy().into_owned()
    }
}
