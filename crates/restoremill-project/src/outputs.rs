//! Files a completed restore is expected to have written

use crate::timestamps::{last_write_time, OutputTimestamp};
use restoremill_foundation::PackageSpec;
use std::path::{Path, PathBuf};

pub const ASSETS_FILE_NAME: &str = "project.assets.json";
pub const NO_OP_CACHE_FILE_NAME: &str = "project.nuget.cache";
pub const TARGETS_EXTENSION: &str = ".targets";
pub const PROPS_EXTENSION: &str = ".props";

pub fn assets_file_path(output_path: &Path) -> PathBuf {
    output_path.join(ASSETS_FILE_NAME)
}

pub fn cache_file_path(output_path: &Path) -> PathBuf {
    output_path.join(NO_OP_CACHE_FILE_NAME)
}

/// `<output>/<project file name>.nuget.g<extension>`
pub fn build_integration_file_path(spec: &PackageSpec, extension: &str) -> PathBuf {
    let project_file = spec
        .project_path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    spec.output_path()
        .join(format!("{}.nuget.g{}", project_file, extension))
}

/// The restore outputs tracked as a freshness fingerprint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFileSet {
    pub assets_file: Option<PathBuf>,
    pub targets_file: Option<PathBuf>,
    pub props_file: Option<PathBuf>,
    /// Lock files are not tracked; this slot is always `None`
    pub lock_file: Option<PathBuf>,
}

impl OutputFileSet {
    pub fn for_project(spec: &PackageSpec) -> Self {
        Self {
            assets_file: Some(assets_file_path(spec.output_path())),
            targets_file: Some(build_integration_file_path(spec, TARGETS_EXTENSION)),
            props_file: Some(build_integration_file_path(spec, PROPS_EXTENSION)),
            lock_file: None,
        }
    }

    /// Read the current timestamps of all four slots
    pub async fn capture(&self) -> OutputTimestamps {
        OutputTimestamps {
            assets: last_write_time(self.assets_file.as_deref()).await,
            targets: last_write_time(self.targets_file.as_deref()).await,
            props: last_write_time(self.props_file.as_deref()).await,
            lock: last_write_time(self.lock_file.as_deref()).await,
        }
    }
}

/// Timestamps of an `OutputFileSet`; equal only when all four slots match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputTimestamps {
    pub assets: OutputTimestamp,
    pub targets: OutputTimestamp,
    pub props: OutputTimestamp,
    pub lock: OutputTimestamp,
}
