//! Prioritized source fallback with partial-file cleanup

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use super::http::{DownloadError, Transport};
use crate::humanize::ByteSize;
use crate::worklist::WorkItem;

/// Result of fetching one work item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success { source: String, bytes: u64 },
    PartialTransfer { source: String, received: u64, expected: u64 },
    SourceUnavailable { source: String, detail: String },
    NoSourceProvided,
    /// The destination could not be written; no source is to blame
    DestinationUnwritable { path: PathBuf, detail: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Local write failures that make further fetching pointless
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchOutcome::DestinationUnwritable { .. })
    }

    fn from_error(source: &str, dest: &Path, err: DownloadError) -> Self {
        match err {
            DownloadError::Io(e) => FetchOutcome::DestinationUnwritable {
                path: dest.to_path_buf(),
                detail: e.to_string(),
            },
            DownloadError::Incomplete { received, expected } => FetchOutcome::PartialTransfer {
                source: source.to_string(),
                received,
                expected,
            },
            other => FetchOutcome::SourceUnavailable {
                source: source.to_string(),
                detail: other.to_string(),
            },
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Success { source, bytes } => {
                write!(f, "downloaded {} from {}", ByteSize(*bytes), source)
            }
            FetchOutcome::PartialTransfer { source, received, expected } => write!(
                f,
                "{}: file was not completely downloaded {} / {}",
                source,
                ByteSize(*received),
                ByteSize(*expected)
            ),
            FetchOutcome::SourceUnavailable { source, detail } => {
                write!(f, "{}: {}", source, detail)
            }
            FetchOutcome::NoSourceProvided => f.write_str("no valid URLs available for download"),
            FetchOutcome::DestinationUnwritable { path, detail } => {
                write!(f, "cannot write {}: {}", path.display(), detail)
            }
        }
    }
}

/// Tries source references in order until one fully succeeds.
///
/// The destination never holds a partial file once `fetch` returns
/// anything but `Success`.
pub struct FetchStrategy<T> {
    transport: T,
}

impl<T: Transport> FetchStrategy<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch(&self, item: &WorkItem, dest: &Path) -> FetchOutcome {
        self.fetch_from(&item.sources(), dest).await
    }

    /// Blank references are skipped; the last failure wins when all fail.
    ///
    /// A destination write failure stops at once without trying later sources.
    pub async fn fetch_from(&self, sources: &[&str], dest: &Path) -> FetchOutcome {
        let mut last_failure = None;

        for source in sources.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            match self.transport.download_to(source, dest).await {
                Ok(bytes) => {
                    debug!(source, dest = %dest.display(), bytes, "Fetched document");
                    return FetchOutcome::Success {
                        source: source.to_string(),
                        bytes,
                    };
                }
                Err(e) => {
                    remove_partial(dest).await;
                    let outcome = FetchOutcome::from_error(source, dest, e);
                    if outcome.is_fatal() {
                        error!(source, cause = %outcome, "Destination not writable");
                        return outcome;
                    }
                    warn!(source, cause = %outcome, "Source failed");
                    last_failure = Some(outcome);
                }
            }
        }

        last_failure.unwrap_or(FetchOutcome::NoSourceProvided)
    }
}

async fn remove_partial(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => debug!(dest = %dest.display(), "Removed partial download"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!(dest = %dest.display(), error = %e, "Failed to remove partial download"),
    }
}
