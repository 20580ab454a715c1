//! Package-reference project backed by the restore-info cache

use crate::assembly::{assemble_package_specs, DependencyGraphCacheContext};
use crate::installed::{get_package_references, PackageIdentity, PackageReference};
use crate::mutation::{
    install_package, uninstall_package, BuildIntegratedInstallationContext,
    PackageReferenceService,
};
use crate::outputs::{assets_file_path, cache_file_path};
use crate::staleness::{RestoreState, StalenessOracle};
use async_trait::async_trait;
use restoremill_cache::RestoreInfoSource;
use restoremill_config::logging::project_span;
use restoremill_foundation::{
    AssetsLogMessage, PackageSpec, ProjectIdentity, RestoreError, RestoreResult, VersionRange,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, Instrument};

/// A project whose restore is integrated with the build
#[async_trait]
pub trait BuildIntegratedProject: Send + Sync {
    fn identity(&self) -> &ProjectIdentity;

    /// `<output>/project.assets.json`; `NotLoaded` before evaluation
    async fn get_assets_file_path(&self) -> RestoreResult<PathBuf>;

    async fn get_assets_file_path_or_none(&self) -> Option<PathBuf>;

    /// `<output>/project.nuget.cache`; `NotLoaded` before evaluation
    async fn get_cache_file_path(&self) -> RestoreResult<PathBuf>;

    async fn get_package_specs_and_additional_messages(
        &self,
        context: Option<&DependencyGraphCacheContext>,
    ) -> RestoreResult<(Vec<PackageSpec>, Vec<AssetsLogMessage>)>;

    async fn get_package_specs(
        &self,
        context: Option<&DependencyGraphCacheContext>,
    ) -> RestoreResult<Vec<PackageSpec>> {
        let (specs, _) = self
            .get_package_specs_and_additional_messages(context)
            .await?;
        Ok(specs)
    }

    async fn get_installed_packages(&self) -> Vec<PackageReference>;

    async fn needs_restore(&self) -> bool;

    async fn report_restore_status(&self, success: bool);

    async fn install_package(
        &self,
        id: &str,
        range: &VersionRange,
        context: &BuildIntegratedInstallationContext,
    ) -> RestoreResult<bool>;

    async fn uninstall_package(&self, identity: &PackageIdentity) -> RestoreResult<bool>;

    /// Projects of this style glob their files; nothing to add
    async fn add_file_to_project(&self, _path: &Path) {}
}

pub struct PackageReferenceProject {
    identity: ProjectIdentity,
    cache: Arc<dyn RestoreInfoSource>,
    oracle: StalenessOracle,
    references: Option<Arc<dyn PackageReferenceService>>,
}

impl fmt::Debug for PackageReferenceProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageReferenceProject")
            .field("identity", &self.identity)
            .field("oracle", &self.oracle)
            .field("has_references", &self.references.is_some())
            .finish()
    }
}

impl PackageReferenceProject {
    pub fn new(identity: ProjectIdentity, cache: Arc<dyn RestoreInfoSource>) -> Self {
        let oracle = StalenessOracle::new(identity.full_path(), identity.spec_key());
        Self {
            identity,
            cache,
            oracle,
            references: None,
        }
    }

    pub fn with_references(mut self, references: Arc<dyn PackageReferenceService>) -> Self {
        self.references = Some(references);
        self
    }

    /// Drop the held snapshot once it is older than `max_age`
    pub fn with_max_snapshot_age(mut self, max_age: Duration) -> Self {
        self.oracle = self.oracle.with_max_snapshot_age(max_age);
        self
    }

    pub fn project_name(&self) -> &str {
        &self.identity.project_name
    }

    pub async fn restore_state(&self) -> RestoreState {
        self.oracle.state().await
    }

    /// Release the snapshot held for the next staleness check
    pub async fn release_snapshot(&self) -> bool {
        self.oracle.evict_snapshot().await
    }

    /// This project's node in the cached snapshot, as evaluation produced it
    pub fn get_package_spec(&self) -> Option<PackageSpec> {
        let info = self
            .cache
            .try_get_project_restore_info(self.identity.full_path())?;
        let spec = info.dg_spec.get_project_spec(&self.identity.spec_key()).cloned();
        trace!(
            project = %self.identity.full_path().display(),
            found = spec.is_some(),
            "Package spec lookup"
        );
        spec
    }

    fn require_package_spec(&self) -> RestoreResult<PackageSpec> {
        self.get_package_spec()
            .ok_or_else(|| RestoreError::not_loaded(self.project_name()))
    }

    fn reference_service(&self) -> RestoreResult<&dyn PackageReferenceService> {
        self.references.as_deref().ok_or_else(|| {
            RestoreError::unsupported_mutation_target(
                self.identity.full_path().display().to_string(),
                "the project does not expose a package reference service",
            )
        })
    }
}

#[async_trait]
impl BuildIntegratedProject for PackageReferenceProject {
    fn identity(&self) -> &ProjectIdentity {
        &self.identity
    }

    async fn get_assets_file_path(&self) -> RestoreResult<PathBuf> {
        let spec = self.require_package_spec()?;
        Ok(assets_file_path(spec.output_path()))
    }

    async fn get_assets_file_path_or_none(&self) -> Option<PathBuf> {
        self.get_package_spec()
            .map(|spec| assets_file_path(spec.output_path()))
    }

    async fn get_cache_file_path(&self) -> RestoreResult<PathBuf> {
        let spec = self.require_package_spec()?;
        Ok(cache_file_path(spec.output_path()))
    }

    async fn get_package_specs_and_additional_messages(
        &self,
        context: Option<&DependencyGraphCacheContext>,
    ) -> RestoreResult<(Vec<PackageSpec>, Vec<AssetsLogMessage>)> {
        assemble_package_specs(
            self.cache.as_ref(),
            self.identity.full_path(),
            self.project_name(),
            context,
        )
    }

    async fn get_installed_packages(&self) -> Vec<PackageReference> {
        self.get_package_spec()
            .map(|spec| get_package_references(&spec))
            .unwrap_or_default()
    }

    async fn needs_restore(&self) -> bool {
        let span = project_span(&self.identity.spec_key(), "needs_restore");
        self.oracle
            .needs_restore(self.cache.as_ref())
            .instrument(span)
            .await
    }

    async fn report_restore_status(&self, success: bool) {
        let span = project_span(&self.identity.spec_key(), "report_restore_status");
        self.oracle
            .report_restore_status(success)
            .instrument(span)
            .await
    }

    async fn install_package(
        &self,
        id: &str,
        range: &VersionRange,
        context: &BuildIntegratedInstallationContext,
    ) -> RestoreResult<bool> {
        let service = self.reference_service()?;
        install_package(service, self.identity.full_path(), id, range, context).await?;
        Ok(true)
    }

    async fn uninstall_package(&self, identity: &PackageIdentity) -> RestoreResult<bool> {
        let service = self.reference_service()?;
        uninstall_package(service, self.identity.full_path(), &identity.id).await?;
        Ok(true)
    }
}
