//! Package install/uninstall against mocked reference services

use restoremill_cache::ProjectSystemCache;
use restoremill_foundation::{
    Framework, LibraryIncludeFlags, ProjectIdentity, RestoreError, VersionRange,
};
use restoremill_project::mutation::{
    INCLUDE_ASSETS_METADATA, PRIVATE_ASSETS_METADATA, TARGET_FRAMEWORK_CONDITION,
    VERSION_METADATA,
};
use restoremill_project::{
    AddReferenceResult, BuildIntegratedInstallationContext, BuildIntegratedProject,
    ConditionalPackageReferenceService, PackageIdentity, PackageReferenceProject,
    ReferenceHandle,
};
use restoremill_test_support::mocks::{
    mock_reference_service, MockConditionalPackageReferenceService,
    MockPackageReferenceService,
};
use mockall::predicate::eq;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const APP: &str = "/repo/App/App.csproj";

fn project(service: MockPackageReferenceService) -> PackageReferenceProject {
    PackageReferenceProject::new(ProjectIdentity::from_path(APP), ProjectSystemCache::shared())
        .with_references(Arc::new(service))
}

fn full_install() -> BuildIntegratedInstallationContext {
    BuildIntegratedInstallationContext::new(
        vec![Framework::parse("net8.0"), Framework::parse("net472")],
        Vec::new(),
        HashMap::new(),
    )
}

fn partial_install() -> BuildIntegratedInstallationContext {
    let mut aliases = HashMap::new();
    aliases.insert(Framework::parse("net8.0"), "net8".to_string());
    BuildIntegratedInstallationContext::new(
        vec![Framework::parse("net8.0"), Framework::parse("netstandard2.0")],
        vec![Framework::parse("net472")],
        aliases,
    )
}

fn range(text: &str) -> VersionRange {
    text.parse().unwrap()
}

#[tokio::test]
async fn test_install_adds_minimum_version() {
    let mut service = mock_reference_service();
    service
        .expect_add()
        .withf(|id, version| id == "Serilog" && version == "3.1.0")
        .times(1)
        .returning(|id, _| {
            Ok(AddReferenceResult {
                added: true,
                reference: ReferenceHandle::new(id),
            })
        });

    let installed = project(service)
        .install_package("Serilog", &range("[3.1, 4.0)"), &full_install())
        .await
        .unwrap();
    assert!(installed);
}

#[tokio::test]
async fn test_install_over_existing_reference_updates_version() {
    let mut service = mock_reference_service();
    service.expect_add().times(1).returning(|id, _| {
        Ok(AddReferenceResult {
            added: false,
            reference: ReferenceHandle::new(id),
        })
    });
    service
        .expect_set_metadata()
        .withf(|reference, name, value| {
            reference.id == "Serilog" && name == VERSION_METADATA && value == "3.1.1"
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    project(service)
        .install_package("Serilog", &range("3.1.1"), &full_install())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_install_writes_asset_overrides() {
    let written: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&written);

    let mut service = mock_reference_service();
    service.expect_add().returning(|id, _| {
        Ok(AddReferenceResult {
            added: true,
            reference: ReferenceHandle::new(id),
        })
    });
    service
        .expect_set_metadata()
        .times(2)
        .returning(move |_, name, value| {
            recorder
                .lock()
                .unwrap()
                .push((name.to_string(), value.to_string()));
            Ok(())
        });

    let mut context = full_install();
    context.suppress_parent = LibraryIncludeFlags::ALL;
    context.include_type = LibraryIncludeFlags::RUNTIME
        | LibraryIncludeFlags::BUILD
        | LibraryIncludeFlags::NATIVE
        | LibraryIncludeFlags::CONTENT_FILES
        | LibraryIncludeFlags::ANALYZERS;

    project(service)
        .install_package("StyleCop.Analyzers", &range("1.1.118"), &context)
        .await
        .unwrap();

    assert_eq!(
        *written.lock().unwrap(),
        vec![
            (PRIVATE_ASSETS_METADATA.to_string(), "all".to_string()),
            (
                INCLUDE_ASSETS_METADATA.to_string(),
                "runtime;build;contentfiles;native;analyzers".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_partial_install_adds_conditional_reference_per_framework() {
    let conditions: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&conditions);

    let mut conditional = MockConditionalPackageReferenceService::new();
    conditional
        .expect_add()
        .withf(|id, version, condition, _| {
            id == "Polly" && version == "8.2.0" && condition == TARGET_FRAMEWORK_CONDITION
        })
        .times(2)
        .returning(move |id, _, condition, value| {
            recorder.lock().unwrap().push(value.to_string());
            Ok(ReferenceHandle::conditional(id, condition, value))
        });
    let conditional: Arc<dyn ConditionalPackageReferenceService> = Arc::new(conditional);

    let mut service = mock_reference_service();
    service
        .expect_conditional()
        .returning(move || Some(Arc::clone(&conditional)));

    project(service)
        .install_package("Polly", &range("8.2.0"), &partial_install())
        .await
        .unwrap();

    assert_eq!(
        *conditions.lock().unwrap(),
        vec!["net8".to_string(), "netstandard2.0".to_string()]
    );
}

#[tokio::test]
async fn test_partial_install_without_conditional_support_fails() {
    let mut service = mock_reference_service();
    service.expect_conditional().returning(|| None);

    let err = project(service)
        .install_package("Polly", &range("8.2.0"), &partial_install())
        .await
        .unwrap_err();

    match err {
        RestoreError::UnsupportedMutationTarget { project_path, .. } => {
            assert_eq!(project_path, APP);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_install_without_reference_service_fails() {
    let project = PackageReferenceProject::new(
        ProjectIdentity::from_path(APP),
        ProjectSystemCache::shared(),
    );
    let err = project
        .install_package("Polly", &range("8.2.0"), &full_install())
        .await
        .unwrap_err();
    assert!(matches!(err, RestoreError::UnsupportedMutationTarget { .. }));
}

#[tokio::test]
async fn test_uninstall_removes_reference() {
    let mut service = mock_reference_service();
    service
        .expect_remove()
        .with(eq("Serilog"))
        .times(1)
        .returning(|_| Ok(()));

    let identity = PackageIdentity {
        id: "Serilog".to_string(),
        version_range: range("3.1.1"),
    };
    assert!(project(service).uninstall_package(&identity).await.unwrap());
}

#[tokio::test]
async fn test_service_errors_propagate() {
    let mut service = mock_reference_service();
    service
        .expect_add()
        .returning(|_, _| Err(RestoreError::mutation("project file is read-only")));

    let err = project(service)
        .install_package("Serilog", &range("3.1.1"), &full_install())
        .await
        .unwrap_err();
    assert!(matches!(err, RestoreError::Mutation { .. }));
}

