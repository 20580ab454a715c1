//! Test support utilities and fixtures for Restoremill integration tests

pub mod helpers;
pub mod mocks;
pub mod workspace;

// Re-export commonly used helpers
pub use helpers::{
    create_test_graph, create_test_settings, create_test_spec, package_dependency,
    with_framework,
};
pub use workspace::TestWorkspace;
