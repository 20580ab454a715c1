//! Last-write instants of restore outputs

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::trace;

/// Last modification instant of a file, or `Absent` when there is no file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum OutputTimestamp {
    #[default]
    Absent,
    Modified(DateTime<Utc>),
}

impl OutputTimestamp {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Read the last-write instant of `path`
///
/// `None`, a blank path, a missing file, a directory, or any metadata error
/// all yield `Absent`. Never fails and never retries.
pub async fn last_write_time(path: Option<&Path>) -> OutputTimestamp {
    let Some(path) = path.filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty()) else {
        return OutputTimestamp::Absent;
    };

    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return OutputTimestamp::Absent,
        Err(e) => {
            trace!(path = %path.display(), error = %e, "Output file not readable");
            return OutputTimestamp::Absent;
        }
    };

    match metadata.modified() {
        Ok(modified) => OutputTimestamp::Modified(DateTime::<Utc>::from(modified)),
        Err(e) => {
            trace!(path = %path.display(), error = %e, "Modification time unavailable");
            OutputTimestamp::Absent
        }
    }
}
