//! Structural validity checks for fetched documents

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ValidationFailure {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("Parser panicked on malformed input")]
    ParserPanic,

    #[error("Document has no pages")]
    NoPages,
}

/// Decides whether a document on disk is usable.
///
/// Implementations are total: every failure is reported as `false`.
pub trait DocumentValidator {
    fn is_valid_document(&self, path: &Path) -> bool;
}

/// PDF validator backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfValidator;

impl PdfValidator {
    pub fn new() -> Self {
        Self
    }

    /// Page count of a well-formed, non-empty document
    pub fn inspect(&self, path: &Path) -> Result<usize, ValidationFailure> {
        let bytes = std::fs::read(path)?;

        // lopdf can panic on some malformed xref tables
        let document = panic::catch_unwind(AssertUnwindSafe(|| lopdf::Document::load_mem(&bytes)))
            .map_err(|_| ValidationFailure::ParserPanic)??;

        match document.get_pages().len() {
            0 => Err(ValidationFailure::NoPages),
            pages => Ok(pages),
        }
    }
}

impl DocumentValidator for PdfValidator {
    fn is_valid_document(&self, path: &Path) -> bool {
        match self.inspect(path) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid document");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document, Object, dictionary};
    use tempfile::TempDir;

    fn pdf_with_pages(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_single_page_document_is_valid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("BR001.pdf");
        std::fs::write(&path, pdf_with_pages(1)).unwrap();

        assert_eq!(PdfValidator::new().inspect(&path).unwrap(), 1);
        assert!(PdfValidator::new().is_valid_document(&path));
    }

    #[test]
    fn test_zero_page_document_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("BR003.pdf");
        std::fs::write(&path, pdf_with_pages(0)).unwrap();

        assert!(matches!(
            PdfValidator::new().inspect(&path),
            Err(ValidationFailure::NoPages)
        ));
        assert!(!PdfValidator::new().is_valid_document(&path));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("junk.pdf");
        std::fs::write(&path, b"<html>not found</html>").unwrap();

        assert!(!PdfValidator::new().is_valid_document(&path));
    }

    #[test]
    fn test_truncated_document_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cut.pdf");
        let bytes = pdf_with_pages(2);
        std::fs::write(&path, &bytes[..bytes.len() / 3]).unwrap();

        assert!(!PdfValidator::new().is_valid_document(&path));
    }

    #[test]
    fn test_empty_and_missing_files_are_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.pdf");
        std::fs::write(&empty, b"").unwrap();

        assert!(!PdfValidator::new().is_valid_document(&empty));
        assert!(matches!(
            PdfValidator::new().inspect(&temp_dir.path().join("absent.pdf")),
            Err(ValidationFailure::Io(_))
        ));
    }
}
