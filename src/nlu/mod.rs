pub mod bounds;
pub mod types;

use crate::{
    config::Service,
    error::{Error, Result},
};
use anyhow::{Context, anyhow};
use reqwest::blocking::{Client, Request};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

pub use bounds::BoundViolation;
pub use types::{
    AnalysisResult, Category, Concept, Disambiguation, Emotion, Entity, Keyword, ParseDiagnostic,
    Sentiment, Usage,
};

/// API version every request is pinned to.
pub const SERVICE_VERSION: &str = "2017-02-27";

/// Feature categories requested on every call. Sentiment and emotion come
/// back inside these when the service infers them.
pub const FEATURES: [&str; 4] = ["categories", "concepts", "entities", "keywords"];

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Inline config values, replaced by the named env vars when those are set.
    pub fn from_config(cfg: &Service) -> anyhow::Result<Self> {
        let username = env_or(&cfg.username_env, &cfg.username);
        let password = env_or(&cfg.password_env, &cfg.password);
        if username.is_empty() {
            return Err(anyhow!(
                "no NLU username: set service.username or ${}",
                cfg.username_env
            ));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn env_or(var: &str, fallback: &str) -> String {
    if !var.is_empty() {
        if let Ok(v) = std::env::var(var) {
            if !v.is_empty() {
                return v;
            }
        }
    }
    fallback.to_string()
}

/// Blocking client for the analyze endpoint. One request per call, no retries.
pub struct NluClient {
    http: Client,
    endpoint: String,
    credentials: Credentials,
}

impl NluClient {
    pub fn new(cfg: &Service, credentials: Credentials) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if cfg.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.timeout_seconds));
        }
        let http = builder.build().with_context(|| "building HTTP client")?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The GET request for `text`. Query values are percent-encoded here,
    /// so reserved characters in the document survive intact.
    pub fn request(&self, text: &str) -> Result<Request> {
        let features = FEATURES.join(",");
        self.http
            .get(&self.endpoint)
            .query(&[
                ("version", SERVICE_VERSION),
                ("text", text),
                ("features", features.as_str()),
            ])
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .build()
            .map_err(|source| self.transport(source))
    }

    /// Sends `text` and ingests the body into `result`. Transport problems and
    /// non-2xx answers are errors; a body that doesn't parse is not, it shows
    /// up in `result.diagnostics()`. Returns whether the body parsed.
    pub fn analyze_into(&self, text: &str, result: &mut AnalysisResult) -> Result<bool> {
        let req = self.request(text)?;
        debug!(
            "NLU GET {} text_chars={} features={}",
            self.endpoint,
            text.chars().count(),
            FEATURES.join(",")
        );

        let resp = self
            .http
            .execute(req)
            .map_err(|source| self.transport(source))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().map_err(|source| self.transport(source))?;
        let parsed = result.ingest(&body);
        info!(
            "NLU response bytes={} parsed={} language={}",
            body.len(),
            parsed,
            result.language.as_deref().unwrap_or("-")
        );
        Ok(parsed)
    }

    pub fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let mut result = AnalysisResult::new();
        self.analyze_into(text, &mut result)?;
        Ok(result)
    }

    fn transport(&self, source: reqwest::Error) -> Error {
        Error::Transport {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}
