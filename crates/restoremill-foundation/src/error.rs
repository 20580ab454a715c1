//! Error handling for restore staleness checks and graph assembly

use thiserror::Error;

/// Error type surfaced to restore callers
///
/// Only conditions that are fatal to the calling operation live here. Degraded
/// information (an evicted snapshot, missing output files, a cache entry that
/// changed between two reads) is never reported as an error; those paths fall
/// back to "assume stale".
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RestoreError {
    /// The restore-info cache has no entry for the project yet
    #[error(
        "The project '{project_name}' has not been evaluated yet, so restore cannot proceed. \
         Re-trigger project evaluation (for example by reloading the project) and try again."
    )]
    NotLoaded { project_name: String },

    /// A package reference mutation targets something the mutation service cannot resolve
    #[error("Unable to update package references for '{project_path}': {reason}")]
    UnsupportedMutationTarget { project_path: String, reason: String },

    /// The external package reference service rejected a mutation
    #[error("Package reference mutation failed: {message}")]
    Mutation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestoreError {
    /// Create a new not loaded error for the named project
    pub fn not_loaded(project_name: impl Into<String>) -> Self {
        Self::NotLoaded {
            project_name: project_name.into(),
        }
    }

    /// Create a new unsupported mutation target error
    pub fn unsupported_mutation_target(
        project_path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedMutationTarget {
            project_path: project_path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new mutation error
    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the caller should re-trigger project evaluation before retrying
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Self::NotLoaded { .. })
    }
}

/// Result type alias for convenience
pub type RestoreResult<T> = Result<T, RestoreError>;
