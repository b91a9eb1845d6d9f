use crate::{
    document::{Document, DocumentFormat},
    engine::Engine,
    error::{Error, Result},
};
use std::path::Path;
use tracing::info;

/// Paragraph separator for `.docx` packages. Pages and legacy paragraphs
/// are concatenated as-is.
pub const PACKAGE_PARAGRAPH_SEPARATOR: &str = "\n";

/// Routes a document to exactly one backend by its format and flattens the
/// backend's units into a single string.
pub struct Extractor<E: Engine> {
    engine: E,
}

impl<E: Engine> Extractor<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Resolves the format before touching any backend: an unsupported
    /// extension fails with [`Error::InvalidFormat`] and nothing runs.
    pub fn extract(&self, path: &Path) -> Result<String> {
        let doc = Document::new(path)?;
        self.extract_document(&doc)
    }

    pub fn extract_document(&self, doc: &Document) -> Result<String> {
        let path = doc.path();
        let format = doc.format();
        let text = match format {
            DocumentFormat::Pdf => self.engine.pdf_pages(path).map(|pages| pages.concat()),
            DocumentFormat::LegacyWord => self
                .engine
                .legacy_paragraphs(path)
                .map(|paragraphs| paragraphs.concat()),
            DocumentFormat::WordPackage => self
                .engine
                .package_paragraphs(path)
                .map(|paragraphs| paragraphs.join(PACKAGE_PARAGRAPH_SEPARATOR)),
        }
        .map_err(|err| Error::extraction(format, path, err))?;

        info!(
            "extracted {} chars from {} ({format})",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    }
}
