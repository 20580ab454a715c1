//! Restore-info cache
//!
//! Project evaluation pushes a `DependencyGraphSpec` (plus diagnostics) for
//! each project it evaluates; restore logic reads it back by project path. The
//! restore side never writes here.
//!
//! Snapshots are stored as `Arc`s so readers share one allocation. Replacing or
//! removing an entry drops only the cache's own reference.

use dashmap::DashMap;
use restoremill_foundation::{AssetsLogMessage, DependencyGraphSpec};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// What project evaluation last produced for a project
#[derive(Debug, Clone)]
pub struct ProjectRestoreInfo {
    pub dg_spec: Arc<DependencyGraphSpec>,
    pub additional_messages: Vec<AssetsLogMessage>,
}

/// Read side of the restore-info cache
pub trait RestoreInfoSource: Send + Sync {
    /// Latest restore info for the project, or `None` when evaluation has not
    /// produced any yet (or failed). `None` never means "no dependencies".
    fn try_get_project_restore_info(&self, project_path: &Path) -> Option<ProjectRestoreInfo>;
}

#[derive(Debug)]
struct CacheEntry {
    project_path: PathBuf,
    info: ProjectRestoreInfo,
}

/// Thread-safe restore-info store keyed by project path
///
/// Keys compare case-insensitively, matching how project systems treat
/// project file paths.
#[derive(Debug, Default)]
pub struct ProjectSystemCache {
    entries: DashMap<String, CacheEntry>,
    version: AtomicU64,
}

impl ProjectSystemCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in Arc for sharing between the evaluation side and restore side
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn key(project_path: &Path) -> String {
        project_path.to_string_lossy().to_lowercase()
    }

    /// Store a freshly evaluated snapshot, replacing any previous one
    pub fn add_project_restore_info(
        &self,
        project_path: &Path,
        dg_spec: DependencyGraphSpec,
        additional_messages: Vec<AssetsLogMessage>,
    ) {
        let info = ProjectRestoreInfo {
            dg_spec: Arc::new(dg_spec),
            additional_messages,
        };
        let replaced = self
            .entries
            .insert(
                Self::key(project_path),
                CacheEntry {
                    project_path: project_path.to_path_buf(),
                    info,
                },
            )
            .is_some();
        self.version.fetch_add(1, Ordering::SeqCst);

        debug!(
            project = %project_path.display(),
            replaced,
            "Project restore info updated"
        );
    }

    /// Forget a project (unloaded or renamed)
    pub fn remove_project(&self, project_path: &Path) -> bool {
        let removed = self.entries.remove(&Self::key(project_path)).is_some();
        if removed {
            self.version.fetch_add(1, Ordering::SeqCst);
            debug!(project = %project_path.display(), "Project removed from restore cache");
        }
        removed
    }

    pub fn contains(&self, project_path: &Path) -> bool {
        self.entries.contains_key(&Self::key(project_path))
    }

    /// Project paths as they were first registered
    pub fn project_paths(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .map(|entry| entry.value().project_path.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic counter bumped on every write
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        self.version.fetch_add(1, Ordering::SeqCst);
        debug!("Cleared {} restore cache entries", count);
    }
}

impl RestoreInfoSource for ProjectSystemCache {
    fn try_get_project_restore_info(&self, project_path: &Path) -> Option<ProjectRestoreInfo> {
        let found = self
            .entries
            .get(&Self::key(project_path))
            .map(|entry| entry.value().info.clone());
        trace!(
            project = %project_path.display(),
            found = found.is_some(),
            "Restore cache lookup"
        );
        found
    }
}

impl<T: RestoreInfoSource + ?Sized> RestoreInfoSource for Arc<T> {
    fn try_get_project_restore_info(&self, project_path: &Path) -> Option<ProjectRestoreInfo> {
        (**self).try_get_project_restore_info(project_path)
    }
}
