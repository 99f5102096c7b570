//! Reconciliation of on-disk documents with worklist identifiers
//!
//! The output directory is the source of truth: each document file named
//! `{identifier}.{extension}` is classified by a [`DocumentValidator`] as
//! Downloaded or Corrupted, and every other identifier is Not Found.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reportfetch::status::{build_status_mapping, StatusCounts};
//! use reportfetch::validator::PdfValidator;
//!
//! let mapping = build_status_mapping(&output_dir, "pdf", &PdfValidator::new())?;
//! let counts = StatusCounts::tally(&mapping, items.iter().map(|i| i.identifier.as_str()));
//! ```
//!
//! [`DocumentValidator`]: crate::validator::DocumentValidator

pub mod mapping;
pub mod scan;

pub use mapping::{DocumentStatus, StatusCounts, StatusMapping};
pub use scan::{build_status_mapping, list_documents};
