use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    /// Word 97-2003 binary (`.doc`), read through an office host process.
    LegacyWord,
    /// Office Open XML package (`.docx`).
    WordPackage,
}

impl DocumentFormat {
    /// Maps a path's extension onto a supported format. Matching ignores ASCII case;
    /// anything else, including a missing extension, is rejected. A bare
    /// dotfile such as `.docx` counts as having that extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .or_else(|| dotfile_extension(path))
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("doc") => Ok(DocumentFormat::LegacyWord),
            Some("docx") => Ok(DocumentFormat::WordPackage),
            _ => Err(Error::InvalidFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// `Path::extension` treats `.docx` as a stem with no extension.
fn dotfile_extension(path: &Path) -> Option<&OsStr> {
    let name = path.file_name()?.to_str()?;
    let ext = name.strip_prefix('.')?;
    (!ext.is_empty() && !ext.contains('.')).then_some(OsStr::new(ext))
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::LegacyWord => "DOC",
            DocumentFormat::WordPackage => "DOCX",
        };
        f.write_str(name)
    }
}

/// A single input file with its format already resolved.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    format: DocumentFormat,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }
}
