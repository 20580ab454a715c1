//! Staleness oracle: decides whether a restore must run again
//!
//! Each check compares what evaluation produced now against the snapshot seen
//! last time and the restore outputs on disk against the timestamps recorded
//! after the last restore. Anything missing or unknown counts as stale.
//!
//! The oracle keeps its own strong handle on the last snapshot, so replacing
//! the cache entry with equal content still compares equal. The handle is
//! dropped only by an explicit eviction or when it outlives the configured
//! maximum age; after that the snapshot slot reads as `Evicted`.

use crate::outputs::{OutputFileSet, OutputTimestamps};
use restoremill_cache::RestoreInfoSource;
use restoremill_foundation::DependencyGraphSpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Freshness verdict of the most recent check or report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreState {
    #[default]
    Unknown,
    Fresh,
    Stale,
}

/// The snapshot seen by the last check
#[derive(Debug, Clone, Default)]
pub enum SnapshotSlot {
    /// No check has observed a snapshot yet, or the cache had no entry
    #[default]
    Empty,
    Held {
        snapshot: Arc<DependencyGraphSpec>,
        observed_at: Instant,
    },
    /// Released by eviction or age-out; freshness is unknown
    Evicted,
}

impl SnapshotSlot {
    fn observe(snapshot: Option<Arc<DependencyGraphSpec>>) -> Self {
        match snapshot {
            Some(snapshot) => Self::Held {
                snapshot,
                observed_at: Instant::now(),
            },
            None => Self::Empty,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<DependencyGraphSpec>> {
        match self {
            Self::Held { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_evicted(&self) -> bool {
        matches!(self, Self::Evicted)
    }
}

/// What the oracle remembers between checks
#[derive(Debug, Default)]
pub struct RestoreOutcomeRecord {
    pub last_snapshot: SnapshotSlot,
    pub last_outputs: OutputTimestamps,
    /// `None` until the first restore is reported
    pub last_restore_succeeded: Option<bool>,
    pub state: RestoreState,
}

impl RestoreOutcomeRecord {
    /// Age out the held snapshot, then return it if still held
    fn live_snapshot(&mut self, max_age: Option<Duration>) -> Option<Arc<DependencyGraphSpec>> {
        if let (SnapshotSlot::Held { observed_at, .. }, Some(max_age)) =
            (&self.last_snapshot, max_age)
        {
            if observed_at.elapsed() >= max_age {
                debug!(?max_age, "Held snapshot aged out");
                self.last_snapshot = SnapshotSlot::Evicted;
            }
        }
        self.last_snapshot.snapshot().cloned()
    }
}

#[derive(Debug)]
pub struct StalenessOracle {
    project_path: PathBuf,
    spec_key: String,
    max_snapshot_age: Option<Duration>,
    record: Mutex<RestoreOutcomeRecord>,
}

impl StalenessOracle {
    /// `spec_key` is the unique name of the project's node in its snapshot
    pub fn new(project_path: impl Into<PathBuf>, spec_key: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            spec_key: spec_key.into(),
            max_snapshot_age: None,
            record: Mutex::new(RestoreOutcomeRecord::default()),
        }
    }

    /// Evict the held snapshot once it is older than `max_age`
    pub fn with_max_snapshot_age(mut self, max_age: Duration) -> Self {
        self.max_snapshot_age = Some(max_age);
        self
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub async fn state(&self) -> RestoreState {
        self.record.lock().await.state
    }

    pub async fn last_restore_succeeded(&self) -> Option<bool> {
        self.record.lock().await.last_restore_succeeded
    }

    /// Release the held snapshot; the next check cannot vouch for freshness
    ///
    /// Returns false when no snapshot was held.
    pub async fn evict_snapshot(&self) -> bool {
        let mut record = self.record.lock().await;
        let held = record.last_snapshot.snapshot().is_some();
        if held {
            record.last_snapshot = SnapshotSlot::Evicted;
            debug!(project = %self.project_path.display(), "Held snapshot evicted");
        }
        held
    }

    /// True when the restore must run; never fails
    pub async fn needs_restore(&self, source: &dyn RestoreInfoSource) -> bool {
        let current = source
            .try_get_project_restore_info(&self.project_path)
            .map(|info| info.dg_spec);

        let mut record = self.record.lock().await;

        let previous = record.live_snapshot(self.max_snapshot_age);
        let snapshot_unchanged = match (previous, current.as_ref()) {
            (Some(previous), Some(current)) => *previous == **current,
            _ => false,
        };
        record.last_snapshot = SnapshotSlot::observe(current.clone());

        let outputs = self.current_outputs(current.as_deref()).await;
        let outputs_unchanged = outputs == record.last_outputs;

        let last_succeeded = record.last_restore_succeeded == Some(true);

        let needs_restore = !(snapshot_unchanged && outputs_unchanged && last_succeeded);
        record.state = if needs_restore {
            RestoreState::Stale
        } else {
            RestoreState::Fresh
        };

        debug!(
            project = %self.project_path.display(),
            has_snapshot = current.is_some(),
            snapshot_unchanged,
            outputs_unchanged,
            last_succeeded,
            needs_restore,
            "Restore staleness check"
        );

        needs_restore
    }

    /// Record the outcome of a completed restore attempt
    ///
    /// When the snapshot seen by the last check is no longer held there is
    /// nothing to read output paths from; the outcome is then recorded as a
    /// success so a later check is decided by snapshot and outputs alone.
    pub async fn report_restore_status(&self, success: bool) {
        let mut record = self.record.lock().await;
        record.last_restore_succeeded = Some(success);

        match record.live_snapshot(self.max_snapshot_age) {
            Some(snapshot) => {
                record.last_outputs = self.current_outputs(Some(snapshot.as_ref())).await;
            }
            None => {
                warn!(
                    project = %self.project_path.display(),
                    "Snapshot released before restore status was reported; assuming success"
                );
                record.last_restore_succeeded = Some(true);
            }
        }

        record.state = if success {
            RestoreState::Fresh
        } else {
            RestoreState::Stale
        };

        info!(
            project = %self.project_path.display(),
            success,
            "Restore status reported"
        );
    }

    async fn current_outputs(&self, snapshot: Option<&DependencyGraphSpec>) -> OutputTimestamps {
        match snapshot.and_then(|s| s.get_project_spec(&self.spec_key)) {
            Some(spec) => OutputFileSet::for_project(spec).capture().await,
            None => OutputTimestamps::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoremill_cache::ProjectSystemCache;
    use restoremill_foundation::PackageSpec;

    const PROJECT: &str = "/repo/App/App.csproj";

    fn graph() -> DependencyGraphSpec {
        DependencyGraphSpec::new().with_restore_root(PackageSpec::new(PROJECT, "/repo/App/obj"))
    }

    #[tokio::test]
    async fn test_first_check_needs_restore() {
        let cache = ProjectSystemCache::new();
        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        let oracle = StalenessOracle::new(PROJECT, PROJECT);

        assert_eq!(oracle.state().await, RestoreState::Unknown);
        assert!(oracle.needs_restore(&cache).await);
        assert_eq!(oracle.state().await, RestoreState::Stale);
    }

    #[tokio::test]
    async fn test_missing_entry_needs_restore() {
        let cache = ProjectSystemCache::new();
        let oracle = StalenessOracle::new(PROJECT, PROJECT);
        assert!(oracle.needs_restore(&cache).await);
        assert!(oracle.needs_restore(&cache).await);
    }

    #[tokio::test]
    async fn test_reported_success_without_outputs_is_fresh() {
        let cache = ProjectSystemCache::new();
        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        let oracle = StalenessOracle::new(PROJECT, PROJECT);

        assert!(oracle.needs_restore(&cache).await);
        oracle.report_restore_status(true).await;
        assert_eq!(oracle.state().await, RestoreState::Fresh);
        assert!(!oracle.needs_restore(&cache).await);
    }

    #[tokio::test]
    async fn test_evicted_snapshot_forces_success() {
        let cache = ProjectSystemCache::new();
        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        let oracle = StalenessOracle::new(PROJECT, PROJECT);
        assert!(oracle.needs_restore(&cache).await);

        assert!(oracle.evict_snapshot().await);
        assert!(!oracle.evict_snapshot().await);
        oracle.report_restore_status(false).await;

        assert_eq!(oracle.last_restore_succeeded().await, Some(true));
        assert_eq!(oracle.state().await, RestoreState::Stale);
    }

    #[tokio::test]
    async fn test_snapshot_survives_cache_replacement() {
        let cache = ProjectSystemCache::new();
        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        let oracle = StalenessOracle::new(PROJECT, PROJECT);
        assert!(oracle.needs_restore(&cache).await);
        oracle.report_restore_status(true).await;

        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        assert!(!oracle.needs_restore(&cache).await);
    }

    #[tokio::test]
    async fn test_aged_out_snapshot_needs_restore() {
        let cache = ProjectSystemCache::new();
        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        let oracle =
            StalenessOracle::new(PROJECT, PROJECT).with_max_snapshot_age(Duration::ZERO);
        assert!(oracle.needs_restore(&cache).await);
        oracle.report_restore_status(true).await;

        assert!(oracle.needs_restore(&cache).await);
        let record = oracle.record.lock().await;
        assert!(record.last_snapshot.snapshot().is_some());
    }

    #[tokio::test]
    async fn test_missing_entry_empties_slot() {
        let cache = ProjectSystemCache::new();
        cache.add_project_restore_info(Path::new(PROJECT), graph(), Vec::new());
        let oracle = StalenessOracle::new(PROJECT, PROJECT);
        assert!(oracle.needs_restore(&cache).await);

        cache.remove_project(Path::new(PROJECT));
        assert!(oracle.needs_restore(&cache).await);
        assert!(matches!(
            oracle.record.lock().await.last_snapshot,
            SnapshotSlot::Empty
        ));
    }
}
