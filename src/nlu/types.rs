use super::bounds::{self, BoundViolation};
use serde::{Deserialize, Serialize};
use serde_json::error::Category as JsonErrorCategory;
use std::fmt;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub text_units: u32,
    pub text_characters: u32,
    pub features: u32,
}

/// Polarity in [-1, 1] with the service's label (`positive`, `neutral`, `negative`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Emotion {
    pub sadness: Option<f64>,
    pub joy: Option<f64>,
    pub fear: Option<f64>,
    pub disgust: Option<f64>,
    pub anger: Option<f64>,
}

impl Emotion {
    pub fn scores(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("sadness", self.sadness),
            ("joy", self.joy),
            ("fear", self.fear),
            ("disgust", self.disgust),
            ("anger", self.anger),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub relevance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disambiguation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "subtype")]
    pub subtypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbpedia_resource: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub text: String,
    pub relevance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<Disambiguation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub text: String,
    pub relevance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbpedia_resource: Option<String>,
}

/// `label` is a hierarchical path such as `/technology and computing/software`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub score: f64,
}

/// Body of a successful analyze call. Every section may be absent.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    usage: Option<Usage>,
    language: Option<String>,
    sentiment: Option<SentimentSection>,
    keywords: Option<Vec<Keyword>>,
    entities: Option<Vec<Entity>>,
    concepts: Option<Vec<Concept>>,
    categories: Option<Vec<Category>>,
}

#[derive(Debug, Deserialize)]
struct SentimentSection {
    document: Option<Sentiment>,
}

/// Why a response body did not (fully) make it into the structured fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseDiagnostic {
    /// Not JSON at all, or truncated.
    InvalidJson { message: String },
    /// JSON, but not shaped like an analyze response.
    SchemaMismatch { message: String },
    /// Parsed, but the service did not report a language.
    MissingLanguage,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDiagnostic::InvalidJson { message } => write!(f, "invalid JSON: {message}"),
            ParseDiagnostic::SchemaMismatch { message } => {
                write!(f, "unexpected response shape: {message}")
            }
            ParseDiagnostic::MissingLanguage => f.write_str("response has no language"),
        }
    }
}

impl ParseDiagnostic {
    fn from_serde(err: &serde_json::Error) -> Self {
        let message = err.to_string();
        match err.classify() {
            JsonErrorCategory::Data => ParseDiagnostic::SchemaMismatch { message },
            JsonErrorCategory::Syntax | JsonErrorCategory::Eof | JsonErrorCategory::Io => {
                ParseDiagnostic::InvalidJson { message }
            }
        }
    }
}

/// Semantic features for a submission, plus every raw body seen.
///
/// `None` on a section means the service did not return it; `Some(vec![])`
/// means it ran and found nothing. Lists keep the service's ranking order.
/// The structured fields describe the most recent ingested body; the raw
/// log and the diagnostics accumulate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Keyword>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<Concept>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<ParseDiagnostic>,
    #[serde(skip)]
    raw_response_log: String,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every body passed to [`ingest`](Self::ingest), newline-terminated, in arrival order.
    pub fn raw_response_log(&self) -> &str {
        &self.raw_response_log
    }

    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    /// Appends `body` to the raw log, then maps it onto the structured
    /// fields. A body that can't be mapped clears them and leaves a
    /// diagnostic instead of an error. Returns whether the body parsed.
    pub fn ingest(&mut self, body: &str) -> bool {
        self.raw_response_log.push_str(body);
        self.raw_response_log.push('\n');

        let parsed: AnalyzeResponse = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                let diag = ParseDiagnostic::from_serde(&err);
                error!("error parsing NLU response: {diag}");
                self.clear_sections();
                self.diagnostics.push(diag);
                return false;
            }
        };

        self.usage = parsed.usage;
        self.language = parsed.language;
        self.sentiment = parsed.sentiment.and_then(|s| s.document);
        self.keywords = parsed.keywords;
        self.entities = parsed.entities;
        self.concepts = parsed.concepts;
        self.categories = parsed.categories;

        if self.language.is_none() {
            warn!("NLU response carries no language");
            self.diagnostics.push(ParseDiagnostic::MissingLanguage);
        }
        for v in self.out_of_range() {
            warn!("{v}");
        }
        true
    }

    /// Scores outside their documented range. They are kept as returned;
    /// this only reports them.
    pub fn out_of_range(&self) -> Vec<BoundViolation> {
        bounds::check(self)
    }

    fn clear_sections(&mut self) {
        self.usage = None;
        self.language = None;
        self.sentiment = None;
        self.keywords = None;
        self.entities = None;
        self.concepts = None;
        self.categories = None;
    }
}
