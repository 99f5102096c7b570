//! Download worker
//!
//! Sequential worker that walks worklist rows, fetches each document
//! through a prioritized source list, and records a per-row outcome.
//! The network sits behind [`http::Transport`] so fetch and cleanup rules
//! can be exercised without one.

pub mod fetch;
pub mod http;
pub mod runner;

pub use fetch::{FetchOutcome, FetchStrategy};
pub use http::{DownloadError, HttpClient, HttpConfig, Transport};
pub use runner::{DestinationError, DownloadSummary, RowOutcome, process_item, run_downloads};
