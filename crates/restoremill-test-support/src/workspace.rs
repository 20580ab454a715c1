//! Temporary project directories with restore outputs on disk

use anyhow::{Context, Result};
use restoremill_foundation::PackageSpec;
use restoremill_project::outputs::{
    assets_file_path, build_integration_file_path, PROPS_EXTENSION, TARGETS_EXTENSION,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A project laid out in a temp directory: `<root>/<name>/<name>.csproj` with `obj/` output
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("failed to create temp dir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn project_path(&self, name: &str) -> PathBuf {
        self.path().join(name).join(format!("{}.csproj", name))
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.path().join(name).join("obj")
    }

    /// A node for project `name`; the project file itself is created on disk
    pub fn create_project(&self, name: &str) -> Result<PackageSpec> {
        let project_path = self.project_path(name);
        if let Some(dir) = project_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&project_path, "<Project Sdk=\"Microsoft.NET.Sdk\" />")?;
        Ok(PackageSpec::new(project_path, self.output_path(name)))
    }

    /// Write the assets, targets and props files a restore of `spec` produces
    pub fn write_restore_outputs(&self, spec: &PackageSpec) -> Result<()> {
        fs::create_dir_all(spec.output_path())?;
        fs::write(assets_file_path(spec.output_path()), "{\"version\": 3}")?;
        fs::write(build_integration_file_path(spec, TARGETS_EXTENSION), "<Project />")?;
        fs::write(build_integration_file_path(spec, PROPS_EXTENSION), "<Project />")?;
        Ok(())
    }

    /// Push a file's modification time forward without relying on clock resolution
    pub fn touch_later(&self, path: &Path) -> Result<()> {
        let current = fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("no mtime for {}", path.display()))?;
        let file = fs::OpenOptions::new().write(true).open(path)?;
        file.set_modified(later(current))?;
        Ok(())
    }
}

fn later(time: SystemTime) -> SystemTime {
    time + Duration::from_secs(5)
}
