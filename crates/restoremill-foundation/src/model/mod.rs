//! Dependency graph model produced by project evaluation
//!
//! Instances read from the restore-info cache are treated as immutable; every
//! correction happens on an owned clone.

pub mod dependency_graph;
pub mod include_flags;
pub mod messages;
pub mod package_spec;
pub mod project_identity;

pub use dependency_graph::DependencyGraphSpec;
pub use include_flags::LibraryIncludeFlags;
pub use messages::{AssetsLogMessage, LogLevel};
pub use package_spec::{
    DependencyTarget, LibraryDependency, PackageSource, PackageSpec, ProjectRestoreMetadata,
    ProjectRestoreMetadataFrameworkInfo, ProjectRestoreReference, ProjectStyle,
    TargetFrameworkInformation,
};
pub use project_identity::ProjectIdentity;
