//! Graph assembly: the corrected node set handed to the restore engine

use crate::overlay::apply_settings;
use dashmap::DashMap;
use restoremill_cache::RestoreInfoSource;
use restoremill_config::{NullSettings, Settings};
use restoremill_foundation::{AssetsLogMessage, PackageSpec, RestoreError, RestoreResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// State shared across one multi-project restore request
///
/// The package-spec cache is keyed by project unique name and is
/// insert-if-absent: the first project to assemble a node wins.
#[derive(Debug)]
pub struct DependencyGraphCacheContext {
    settings: Arc<dyn Settings>,
    package_spec_cache: DashMap<String, PackageSpec>,
}

impl DependencyGraphCacheContext {
    pub fn new(settings: Arc<dyn Settings>) -> Self {
        Self {
            settings,
            package_spec_cache: DashMap::new(),
        }
    }

    pub fn settings(&self) -> &dyn Settings {
        self.settings.as_ref()
    }

    pub fn package_spec_cache(&self) -> &DashMap<String, PackageSpec> {
        &self.package_spec_cache
    }

    pub fn cached_spec(&self, unique_name: &str) -> Option<PackageSpec> {
        self.package_spec_cache
            .get(unique_name)
            .map(|entry| entry.value().clone())
    }

    /// Seed a node; returns false when one is already cached under that name
    pub fn try_insert(&self, spec: PackageSpec) -> bool {
        match self.package_spec_cache.entry(spec.unique_name().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(spec);
                true
            }
        }
    }
}

/// Clone and overlay every node of the project's cached snapshot
///
/// Fails with `NotLoaded` naming `project_name` when evaluation has not
/// produced restore info for `project_path`.
pub fn assemble_package_specs(
    source: &dyn RestoreInfoSource,
    project_path: &Path,
    project_name: &str,
    context: Option<&DependencyGraphCacheContext>,
) -> RestoreResult<(Vec<PackageSpec>, Vec<AssetsLogMessage>)> {
    let info = source
        .try_get_project_restore_info(project_path)
        .ok_or_else(|| RestoreError::not_loaded(project_name))?;

    let settings: &dyn Settings = match context {
        Some(context) => context.settings(),
        None => &NullSettings,
    };

    let mut projects = Vec::with_capacity(info.dg_spec.projects().len());
    for original in info.dg_spec.projects() {
        let corrected = apply_settings(original, settings);

        if let Some(context) = context {
            let inserted = context.try_insert(corrected.clone());
            trace!(
                unique_name = %corrected.unique_name(),
                inserted,
                "Package spec cache"
            );
        }

        projects.push(corrected);
    }

    debug!(
        project = %project_path.display(),
        nodes = projects.len(),
        messages = info.additional_messages.len(),
        "Assembled package specs"
    );

    Ok((projects, info.additional_messages))
}
