//! Restore staleness detection and graph assembly for package-reference projects
//!
//! A `PackageReferenceProject` reads what project evaluation pushed into the
//! restore-info cache and answers two questions for the restore driver:
//! does this project need a restore, and what dependency graph should the
//! restore engine be given. After the restore finishes the driver reports the
//! outcome so the next check has something to compare against.

pub mod assembly;
pub mod installed;
pub mod mutation;
pub mod outputs;
pub mod overlay;
pub mod project;
pub mod provider;
pub mod staleness;
pub mod timestamps;

pub use assembly::{assemble_package_specs, DependencyGraphCacheContext};
pub use installed::{get_package_references, PackageIdentity, PackageReference};
pub use mutation::{
    AddReferenceResult, BuildIntegratedInstallationContext, ConditionalPackageReferenceService,
    PackageReferenceService, ReferenceHandle,
};
pub use outputs::{OutputFileSet, OutputTimestamps};
pub use overlay::apply_settings;
pub use project::{BuildIntegratedProject, PackageReferenceProject};
pub use provider::{PackageReferenceProjectProvider, ProjectAdapter};
pub use staleness::{RestoreOutcomeRecord, RestoreState, SnapshotSlot, StalenessOracle};
pub use timestamps::{last_write_time, OutputTimestamp};
