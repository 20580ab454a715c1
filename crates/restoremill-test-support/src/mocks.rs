//! Mock implementations for testing

use async_trait::async_trait;
use mockall::mock;
use restoremill_cache::{ProjectRestoreInfo, RestoreInfoSource};
use restoremill_foundation::{ProjectIdentity, RestoreResult};
use restoremill_project::{
    AddReferenceResult, ConditionalPackageReferenceService, PackageReferenceService,
    ProjectAdapter, ReferenceHandle,
};
use std::path::Path;
use std::sync::Arc;

mock! {
    pub PackageReferenceService {}

    #[async_trait]
    impl PackageReferenceService for PackageReferenceService {
        async fn add(&self, id: &str, version: &str) -> RestoreResult<AddReferenceResult>;
        async fn set_metadata(
            &self,
            reference: &ReferenceHandle,
            name: &str,
            value: &str,
        ) -> RestoreResult<()>;
        async fn remove(&self, id: &str) -> RestoreResult<()>;
        fn conditional(&self) -> Option<Arc<dyn ConditionalPackageReferenceService>>;
    }
}

mock! {
    pub ConditionalPackageReferenceService {}

    #[async_trait]
    impl ConditionalPackageReferenceService for ConditionalPackageReferenceService {
        async fn add(
            &self,
            id: &str,
            version: &str,
            condition_name: &str,
            condition_value: &str,
        ) -> RestoreResult<ReferenceHandle>;
    }
}

mock! {
    pub ProjectAdapter {}

    #[async_trait]
    impl ProjectAdapter for ProjectAdapter {
        fn identity(&self) -> ProjectIdentity;
        fn is_capability_match(&self, capability: &str) -> bool;
        async fn build_property(&self, name: &str) -> Option<String>;
        fn package_reference_service(&self) -> Option<Arc<dyn PackageReferenceService>>;
    }
}

mock! {
    pub RestoreInfoSource {}

    impl RestoreInfoSource for RestoreInfoSource {
        fn try_get_project_restore_info(&self, project_path: &Path) -> Option<ProjectRestoreInfo>;
    }
}

/// Create a mock package reference service for testing
pub fn mock_reference_service() -> MockPackageReferenceService {
    MockPackageReferenceService::new()
}

/// Create a mock adapter that looks like an SDK-style project at `project_path`
///
/// Properties not named in `properties` read as unset.
pub fn mock_sdk_project(
    project_path: &Path,
    properties: &[(&'static str, &'static str)],
) -> MockProjectAdapter {
    let identity = ProjectIdentity::from_path(project_path);
    let properties: Vec<(&'static str, &'static str)> = properties.to_vec();

    let mut adapter = MockProjectAdapter::new();
    adapter.expect_identity().returning(move || identity.clone());
    adapter
        .expect_is_capability_match()
        .returning(|capability| capability == "CPS");
    adapter.expect_build_property().returning(move |name| {
        properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    });
    adapter
        .expect_package_reference_service()
        .returning(|| None);
    adapter
}
