use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: Service,
    #[serde(default)]
    pub legacy: Legacy,
    #[serde(default)]
    pub text: Text,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Env var that, when set, replaces `username`.
    pub username_env: String,
    /// Env var that, when set, replaces `password`.
    pub password_env: String,
    /// 0 leaves the transport's own default in place.
    pub timeout_seconds: u64,
}
impl Default for Service {
    fn default() -> Self {
        Self {
            endpoint: "https://gateway.watsonplatform.net/natural-language-understanding/api/v1/analyze"
                .into(),
            username: "".into(),
            password: "".into(),
            username_env: "RESUME_NLU_USERNAME".into(),
            password_env: "RESUME_NLU_PASSWORD".into(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Legacy {
    /// Office host executable. `auto` means `soffice` on PATH; the
    /// `RESUME_NLU_OFFICE` env var overrides either.
    pub program: String,
    /// Arguments placed before the document path.
    pub args: Vec<String>,
    /// The host is killed after this long. 0 disables the limit.
    pub timeout_seconds: u64,
}
impl Default for Legacy {
    fn default() -> Self {
        Self {
            program: "auto".into(),
            args: vec!["--headless".into(), "--norestore".into(), "--cat".into()],
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    pub normalize_newlines: bool,
    pub normalize_unicode: bool,
    pub control_chars_to_sanitize: Vec<u8>,
    pub collapse_blank_lines: bool,
    pub trim_trailing_whitespace: bool,
    /// 0 means no cap.
    pub max_chars: usize,
}
impl Default for Text {
    fn default() -> Self {
        Self {
            normalize_newlines: true,
            normalize_unicode: false,
            // Word object anchors, cell ends and field marks.
            control_chars_to_sanitize: vec![1, 7, 19, 20, 21],
            collapse_blank_lines: true,
            trim_trailing_whitespace: true,
            max_chars: 50_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub out_dir: String,
    pub write_text: bool,
    pub write_analysis_json: bool,
    pub write_raw_log: bool,
    pub write_report_json: bool,
    pub text_filename: String,
    pub analysis_filename: String,
    pub raw_log_filename: String,
    pub report_filename: String,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            write_text: true,
            write_analysis_json: true,
            write_raw_log: true,
            write_report_json: true,
            text_filename: "text.txt".into(),
            analysis_filename: "analysis.json".into(),
            raw_log_filename: "raw-responses.log".into(),
            report_filename: "report.json".into(),
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
