//! Recognizes package-reference projects and builds `PackageReferenceProject`s for them

use crate::mutation::PackageReferenceService;
use crate::project::PackageReferenceProject;
use async_trait::async_trait;
use restoremill_cache::RestoreInfoSource;
use restoremill_foundation::{ProjectIdentity, ProjectStyle};
use std::sync::Arc;
use tracing::debug;

pub const CPS_CAPABILITY: &str = "CPS";
pub const RESTORE_PROJECT_STYLE_PROPERTY: &str = "RestoreProjectStyle";
pub const TARGET_FRAMEWORK_PROPERTY: &str = "TargetFramework";
pub const TARGET_FRAMEWORKS_PROPERTY: &str = "TargetFrameworks";

/// The host's view of a loaded project
#[async_trait]
pub trait ProjectAdapter: Send + Sync {
    fn identity(&self) -> ProjectIdentity;

    fn is_capability_match(&self, capability: &str) -> bool;

    /// Evaluated MSBuild property value; `None` when unset
    async fn build_property(&self, name: &str) -> Option<String>;

    fn package_reference_service(&self) -> Option<Arc<dyn PackageReferenceService>>;
}

pub struct PackageReferenceProjectProvider {
    cache: Arc<dyn RestoreInfoSource>,
}

impl PackageReferenceProjectProvider {
    pub fn new(cache: Arc<dyn RestoreInfoSource>) -> Self {
        Self { cache }
    }

    /// Build a project for `adapter`, or `None` when it is not a
    /// package-reference project with target frameworks
    pub async fn try_create_project(
        &self,
        adapter: &dyn ProjectAdapter,
    ) -> Option<PackageReferenceProject> {
        let identity = adapter.identity();

        if !adapter.is_capability_match(CPS_CAPABILITY) {
            debug!(project = %identity.full_path().display(), "Not a CPS project");
            return None;
        }

        let restore_style =
            non_empty(adapter.build_property(RESTORE_PROJECT_STYLE_PROPERTY).await);
        let target_framework = non_empty(adapter.build_property(TARGET_FRAMEWORK_PROPERTY).await);
        let target_frameworks =
            non_empty(adapter.build_property(TARGET_FRAMEWORKS_PROPERTY).await);

        if let Some(style) = &restore_style {
            if !is_package_reference_style(style) {
                debug!(
                    project = %identity.full_path().display(),
                    restore_style = %style,
                    "Restore project style is not PackageReference"
                );
                return None;
            }
        }

        if target_framework.is_none() && target_frameworks.is_none() {
            debug!(
                project = %identity.full_path().display(),
                "Neither TargetFramework nor TargetFrameworks is set"
            );
            return None;
        }

        let mut project = PackageReferenceProject::new(identity, Arc::clone(&self.cache));
        if let Some(references) = adapter.package_reference_service() {
            project = project.with_references(references);
        }
        Some(project)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_package_reference_style(style: &str) -> bool {
    style.eq_ignore_ascii_case(&format!("{:?}", ProjectStyle::PackageReference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_reference_style_is_case_insensitive() {
        assert!(is_package_reference_style("PackageReference"));
        assert!(is_package_reference_style("packagereference"));
        assert!(!is_package_reference_style("PackagesConfig"));
    }

    #[test]
    fn test_empty_property_counts_as_unset() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("net8.0".into())), Some("net8.0".to_string()));
    }
}
