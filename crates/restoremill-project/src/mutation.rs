//! Package reference mutation through the host's reference services
//!
//! The host owns the project file; these functions only decide which calls to
//! make against `PackageReferenceService` for an install or uninstall.

use async_trait::async_trait;
use restoremill_foundation::{
    Framework, LibraryIncludeFlags, RestoreError, RestoreResult, VersionRange,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// MSBuild condition used for framework-scoped references
pub const TARGET_FRAMEWORK_CONDITION: &str = "TargetFramework";
pub const VERSION_METADATA: &str = "Version";
pub const PRIVATE_ASSETS_METADATA: &str = "PrivateAssets";
pub const INCLUDE_ASSETS_METADATA: &str = "IncludeAssets";

/// Opaque handle to a package reference item in the project file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceHandle {
    pub id: String,
    /// `Some((condition name, condition value))` for conditional references
    pub condition: Option<(String, String)>,
}

impl ReferenceHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition: None,
        }
    }

    pub fn conditional(
        id: impl Into<String>,
        condition_name: impl Into<String>,
        condition_value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            condition: Some((condition_name.into(), condition_value.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReferenceResult {
    /// False when a reference with this id already existed
    pub added: bool,
    pub reference: ReferenceHandle,
}

/// Unconditional package reference operations on a project
#[async_trait]
pub trait PackageReferenceService: Send + Sync {
    async fn add(&self, id: &str, version: &str) -> RestoreResult<AddReferenceResult>;

    async fn set_metadata(
        &self,
        reference: &ReferenceHandle,
        name: &str,
        value: &str,
    ) -> RestoreResult<()>;

    async fn remove(&self, id: &str) -> RestoreResult<()>;

    /// Framework-scoped reference support, when the project system has it
    fn conditional(&self) -> Option<Arc<dyn ConditionalPackageReferenceService>>;
}

#[async_trait]
pub trait ConditionalPackageReferenceService: Send + Sync {
    async fn add(
        &self,
        id: &str,
        version: &str,
        condition_name: &str,
        condition_value: &str,
    ) -> RestoreResult<ReferenceHandle>;
}

/// Outcome of resolving a package against each target framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIntegratedInstallationContext {
    pub successful_frameworks: Vec<Framework>,
    pub unsuccessful_frameworks: Vec<Framework>,
    /// Framework alias as written in the project file, by parsed framework
    pub original_frameworks: HashMap<Framework, String>,
    pub suppress_parent: LibraryIncludeFlags,
    pub include_type: LibraryIncludeFlags,
}

impl BuildIntegratedInstallationContext {
    pub fn new(
        successful_frameworks: Vec<Framework>,
        unsuccessful_frameworks: Vec<Framework>,
        original_frameworks: HashMap<Framework, String>,
    ) -> Self {
        Self {
            successful_frameworks,
            unsuccessful_frameworks,
            original_frameworks,
            suppress_parent: LibraryIncludeFlags::DEFAULT_SUPPRESS_PARENT,
            include_type: LibraryIncludeFlags::ALL,
        }
    }

    /// Installation into a subset of the project's frameworks
    pub fn is_partial(&self) -> bool {
        !self.successful_frameworks.is_empty() && !self.unsuccessful_frameworks.is_empty()
    }

    /// Whether `PrivateAssets`/`IncludeAssets` must be written on the reference
    pub fn has_asset_overrides(&self) -> bool {
        self.suppress_parent != LibraryIncludeFlags::DEFAULT_SUPPRESS_PARENT
            && self.include_type != LibraryIncludeFlags::ALL
    }

    fn alias_for(&self, framework: &Framework) -> String {
        self.original_frameworks
            .get(framework)
            .cloned()
            .unwrap_or_else(|| framework.short_folder_name())
    }
}

/// Add or update a reference to `id` at the minimum version of `range`
pub async fn install_package(
    service: &dyn PackageReferenceService,
    project_path: &Path,
    id: &str,
    range: &VersionRange,
    context: &BuildIntegratedInstallationContext,
) -> RestoreResult<()> {
    let version = range.min_version().ok_or_else(|| {
        RestoreError::mutation(format!(
            "Cannot install '{}' with range '{}': it has no minimum version",
            id, range
        ))
    })?;

    info!(
        project = %project_path.display(),
        package = %id,
        version = %version,
        partial = context.is_partial(),
        "Installing package"
    );

    if context.is_partial() {
        let conditional = service.conditional().ok_or_else(|| {
            RestoreError::unsupported_mutation_target(
                project_path.display().to_string(),
                "partial installs require conditional package references",
            )
        })?;

        for framework in &context.successful_frameworks {
            let alias = context.alias_for(framework);
            let reference = conditional
                .add(id, version, TARGET_FRAMEWORK_CONDITION, &alias)
                .await?;
            debug!(package = %id, framework = %alias, "Added conditional package reference");

            set_asset_overrides(service, &reference, context).await?;
        }
    } else {
        let result = service.add(id, version).await?;
        if !result.added {
            service
                .set_metadata(&result.reference, VERSION_METADATA, version)
                .await?;
            debug!(package = %id, version = %version, "Updated existing package reference");
        }

        set_asset_overrides(service, &result.reference, context).await?;
    }

    Ok(())
}

pub async fn uninstall_package(
    service: &dyn PackageReferenceService,
    project_path: &Path,
    id: &str,
) -> RestoreResult<()> {
    info!(project = %project_path.display(), package = %id, "Uninstalling package");
    service.remove(id).await
}

async fn set_asset_overrides(
    service: &dyn PackageReferenceService,
    reference: &ReferenceHandle,
    context: &BuildIntegratedInstallationContext,
) -> RestoreResult<()> {
    if !context.has_asset_overrides() {
        return Ok(());
    }

    service
        .set_metadata(
            reference,
            PRIVATE_ASSETS_METADATA,
            &context.suppress_parent.flag_string(),
        )
        .await?;
    service
        .set_metadata(
            reference,
            INCLUDE_ASSETS_METADATA,
            &context.include_type.flag_string(),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_requires_both_sides() {
        let net8 = Framework::parse("net8.0");
        let net472 = Framework::parse("net472");

        let full =
            BuildIntegratedInstallationContext::new(vec![net8.clone()], Vec::new(), HashMap::new());
        assert!(!full.is_partial());

        let partial =
            BuildIntegratedInstallationContext::new(vec![net8], vec![net472], HashMap::new());
        assert!(partial.is_partial());
    }

    #[test]
    fn test_asset_overrides_need_both_flags_changed() {
        let mut context =
            BuildIntegratedInstallationContext::new(Vec::new(), Vec::new(), HashMap::new());
        assert!(!context.has_asset_overrides());

        context.suppress_parent = LibraryIncludeFlags::ALL;
        assert!(!context.has_asset_overrides());

        context.include_type = LibraryIncludeFlags::RUNTIME | LibraryIncludeFlags::COMPILE;
        assert!(context.has_asset_overrides());
    }

    #[test]
    fn test_alias_falls_back_to_short_folder_name() {
        let net8 = Framework::parse("net8.0");
        let mut aliases = HashMap::new();
        aliases.insert(net8.clone(), "net8".to_string());
        let context = BuildIntegratedInstallationContext::new(Vec::new(), Vec::new(), aliases);

        assert_eq!(context.alias_for(&net8), "net8");
        assert_eq!(context.alias_for(&Framework::parse("netstandard2.0")), "netstandard2.0");
    }
}
