pub mod docx;
pub mod host;
pub mod native;

use anyhow::Result;
use std::path::Path;

pub use host::{HostGuard, OfficeHost, WordHost};
pub use native::NativeEngine;

/// Format backends. Each call returns the document's units (pages or
/// paragraphs) in file order, or fails as a whole: a backend never hands
/// back the units it managed to read before an error.
pub trait Engine {
    fn pdf_pages(&self, input: &Path) -> Result<Vec<String>>;
    fn legacy_paragraphs(&self, input: &Path) -> Result<Vec<String>>;
    fn package_paragraphs(&self, input: &Path) -> Result<Vec<String>>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn pdf_pages(&self, input: &Path) -> Result<Vec<String>> {
        (**self).pdf_pages(input)
    }

    fn legacy_paragraphs(&self, input: &Path) -> Result<Vec<String>> {
        (**self).legacy_paragraphs(input)
    }

    fn package_paragraphs(&self, input: &Path) -> Result<Vec<String>> {
        (**self).package_paragraphs(input)
    }
}
