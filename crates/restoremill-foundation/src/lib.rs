//! Foundation Layer - dependency graph model, framework names and errors
//!
//! This crate provides the building blocks shared by every Restoremill crate:
//! - The dependency graph model (`PackageSpec`, `DependencyGraphSpec`) as
//!   produced by project evaluation
//! - Target framework and version range value types
//! - The error taxonomy used by restore callers

pub mod error;
pub mod framework;
pub mod model;
pub mod version;

// Re-export commonly used types for convenience
pub use error::*;
pub use framework::{Framework, FrameworkFamily};
pub use model::*;
pub use version::{VersionRange, VersionRangeParseError};
