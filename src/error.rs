use crate::document::DocumentFormat;
use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced to the caller. Response parse problems are not here:
/// they degrade into [`crate::nlu::ParseDiagnostic`]s on the result instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid document format (expected .pdf, .doc or .docx): {}", path.display())]
    InvalidFormat { path: PathBuf },

    #[error("{format} extraction failed for {}: {source}", path.display())]
    Extraction {
        format: DocumentFormat,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("NLU request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("NLU service at {endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
}

impl Error {
    pub(crate) fn extraction(
        format: DocumentFormat,
        path: impl Into<PathBuf>,
        source: anyhow::Error,
    ) -> Self {
        Error::Extraction {
            format,
            path: path.into(),
            source: source.into(),
        }
    }

    /// The format whose strategy failed, if this is an extraction failure.
    pub fn format(&self) -> Option<DocumentFormat> {
        match self {
            Error::Extraction { format, .. } => Some(*format),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Status { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
