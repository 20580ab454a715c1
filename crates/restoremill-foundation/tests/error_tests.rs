//! Tests for error handling

use restoremill_foundation::{RestoreError, RestoreResult};
use std::io;

#[test]
fn test_not_loaded_message_names_project() {
    let error = RestoreError::not_loaded("WebApp");
    let message = error.to_string();
    assert!(message.contains("'WebApp'"));
    assert!(message.contains("has not been evaluated yet"));
    assert!(message.contains("Re-trigger project evaluation"));
    assert!(error.is_not_loaded());
}

#[test]
fn test_unsupported_mutation_target() {
    let error = RestoreError::unsupported_mutation_target(
        "/repo/App/App.csproj",
        "no conditional package reference service",
    );
    match error {
        RestoreError::UnsupportedMutationTarget {
            project_path,
            reason,
        } => {
            assert_eq!(project_path, "/repo/App/App.csproj");
            assert_eq!(reason, "no conditional package reference service");
        }
        _ => panic!("Expected unsupported mutation target error"),
    }
}

#[test]
fn test_error_chain() {
    fn inner_function() -> Result<(), io::Error> {
        Err(io::Error::new(io::ErrorKind::NotFound, "missing dgspec"))
    }

    fn outer_function() -> RestoreResult<()> {
        inner_function()?;
        Ok(())
    }

    match outer_function().unwrap_err() {
        RestoreError::Io(io_error) => assert_eq!(io_error.kind(), io::ErrorKind::NotFound),
        other => panic!("Expected IO error, got {:?}", other),
    }
    assert!(!RestoreError::config("bad").is_not_loaded());
}
