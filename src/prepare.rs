//! Cleanup applied to extracted text before it is submitted for analysis.
//! Extraction output itself is left untouched; this runs on a copy.

use crate::config::Text;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

pub fn prepare_for_analysis(cfg: &Text, text: &str) -> String {
    let mut s = text.to_string();

    if cfg.normalize_newlines {
        // Legacy paragraphs end in CR; VT and FF are Word line and page breaks.
        s = s
            .replace("\r\n", "\n")
            .replace(['\r', '\u{000B}', '\u{000C}'], "\n");
    }

    if cfg.normalize_unicode {
        s = s.nfkc().collect::<String>();
    }

    s = sanitize_control_chars(&s, &cfg.control_chars_to_sanitize);

    if cfg.trim_trailing_whitespace {
        s = s
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
    }

    if cfg.collapse_blank_lines {
        s = blank_run().replace_all(&s, "\n\n").into_owned();
        s = s.trim_matches('\n').to_string();
    }

    if cfg.max_chars > 0 {
        s = truncate_chars(&s, cfg.max_chars);
    }

    s
}

fn blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+\n").expect("static regex"))
}

fn sanitize_control_chars(s: &str, codes: &[u8]) -> String {
    if codes.is_empty() {
        return s.to_string();
    }

    let mut mask = [false; 128];
    for &code in codes {
        if (code as usize) < mask.len() {
            mask[code as usize] = true;
        }
    }

    s.chars()
        .filter(|&ch| {
            if ch == '\n' || ch == '\r' || ch == '\t' {
                return true;
            }
            let cp = ch as u32;
            if cp < 128 { !mask[cp as usize] } else { true }
        })
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => {
            warn!(
                "submission text truncated to {max} chars (was {})",
                s.chars().count()
            );
            s[..cut].to_string()
        }
        None => s.to_string(),
    }
}
