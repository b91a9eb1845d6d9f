pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod nlu;
pub mod prepare;
pub mod report;
pub mod util;

pub use document::{Document, DocumentFormat};
pub use error::{Error, Result};
pub use extract::Extractor;
pub use nlu::{AnalysisResult, Credentials, NluClient};
