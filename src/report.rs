use crate::{
    document::DocumentFormat,
    nlu::{BoundViolation, ParseDiagnostic},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: InputReport,
    pub text: TextReport,
    pub analysis: AnalysisReport,
    pub started: String,
    pub finished: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputReport {
    pub path: String,
    pub format: DocumentFormat,
    pub file_bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextReport {
    pub extracted_chars: usize,
    pub submitted_chars: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub endpoint: String,
    pub version: &'static str,
    pub parsed: bool,
    pub language: Option<String>,
    pub keywords: Option<usize>,
    pub entities: Option<usize>,
    pub concepts: Option<usize>,
    pub categories: Option<usize>,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub out_of_range: Vec<BoundViolation>,
}
