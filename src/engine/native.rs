use super::{Engine, docx, host::WordHost};
use anyhow::{Result, anyhow, bail};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use tracing::debug;

/// Production backends: the PDF codec in-process, the DOCX package reader
/// in-process, and `.doc` files through a [`WordHost`].
pub struct NativeEngine<H: WordHost> {
    host: H,
}

impl<H: WordHost> NativeEngine<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: WordHost> Engine for NativeEngine<H> {
    fn pdf_pages(&self, input: &Path) -> Result<Vec<String>> {
        ensure_file(input)?;
        // The codec panics on some malformed inputs instead of returning an error.
        let pages = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(input)))
            .map_err(|_| anyhow!("pdf codec panicked on {}", input.display()))?
            .map_err(|e| anyhow!("pdf text extraction: {}: {e}", input.display()))?;
        debug!("pdf {} pages={}", input.display(), pages.len());
        Ok(pages)
    }

    fn legacy_paragraphs(&self, input: &Path) -> Result<Vec<String>> {
        ensure_file(input)?;
        let paragraphs = self.host.paragraphs(input)?;
        debug!("doc {} paragraphs={}", input.display(), paragraphs.len());
        Ok(paragraphs)
    }

    fn package_paragraphs(&self, input: &Path) -> Result<Vec<String>> {
        ensure_file(input)?;
        let paragraphs = docx::read_paragraphs(input)?;
        debug!("docx {} paragraphs={}", input.display(), paragraphs.len());
        Ok(paragraphs)
    }
}

fn ensure_file(input: &Path) -> Result<()> {
    if !input.is_file() {
        bail!("input does not exist or is not a file: {}", input.display());
    }
    Ok(())
}
