//! Paragraph text out of an Office Open XML word-processing package.
//!
//! Only the main document part (`word/document.xml`) is read. Headers, footers,
//! comments and footnotes live in other parts and are not part of the body text.

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("open package: {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("not a zip package: {}", path.display()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .with_context(|| format!("package has no {DOCUMENT_PART}"))?
        .read_to_string(&mut xml)
        .with_context(|| format!("reading {DOCUMENT_PART}"))?;

    paragraphs_from_xml(&xml)
}

/// Walks `w:p` elements in document order. Run content maps as: `w:t` text,
/// `w:tab` a tab, `w:br`/`w:cr` a newline. `mc:Fallback` branches repeat the
/// `mc:Choice` content and are skipped.
pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside paragraphs.
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut fallback_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("malformed {DOCUMENT_PART} at byte {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth += 1,
                _ if fallback_depth > 0 => {}
                b"w:p" => open.push(String::new()),
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                b"w:tab" if run_depth > 0 => append(&mut open, "\t"),
                b"w:br" | b"w:cr" if run_depth > 0 => append(&mut open, "\n"),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                _ if fallback_depth > 0 => {}
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if run_depth > 0 => append(&mut open, "\t"),
                b"w:br" | b"w:cr" if run_depth > 0 => append(&mut open, "\n"),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
                _ if fallback_depth > 0 => {}
                b"w:p" => {
                    if let Some(p) = open.pop() {
                        paragraphs.push(p);
                    }
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text && fallback_depth == 0 => {
                let text = t
                    .unescape()
                    .with_context(|| format!("bad text escape in {DOCUMENT_PART}"))?;
                append(&mut open, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn append(open: &mut [String], s: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(s);
    }
}
