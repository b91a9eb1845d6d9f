use super::types::{AnalysisResult, Emotion, Sentiment};
use serde::Serialize;
use std::fmt;

pub const UNIT_RANGE: (f64, f64) = (0.0, 1.0);
pub const POLARITY_RANGE: (f64, f64) = (-1.0, 1.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundViolation {
    /// Path into the result, e.g. `keywords[3].relevance`.
    pub field: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for BoundViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} is outside [{}, {}]",
            self.field, self.value, self.min, self.max
        )
    }
}

pub fn check(result: &AnalysisResult) -> Vec<BoundViolation> {
    let mut out = Vec::new();

    if let Some(s) = &result.sentiment {
        polarity(&mut out, "sentiment.score".into(), s);
    }

    for (i, k) in result.keywords.iter().flatten().enumerate() {
        unit(&mut out, format!("keywords[{i}].relevance"), k.relevance);
        if let Some(s) = &k.sentiment {
            polarity(&mut out, format!("keywords[{i}].sentiment.score"), s);
        }
        if let Some(e) = &k.emotion {
            emotion(&mut out, &format!("keywords[{i}].emotion"), e);
        }
    }

    for (i, ent) in result.entities.iter().flatten().enumerate() {
        unit(&mut out, format!("entities[{i}].relevance"), ent.relevance);
        if let Some(s) = &ent.sentiment {
            polarity(&mut out, format!("entities[{i}].sentiment.score"), s);
        }
        if let Some(e) = &ent.emotion {
            emotion(&mut out, &format!("entities[{i}].emotion"), e);
        }
    }

    for (i, c) in result.concepts.iter().flatten().enumerate() {
        unit(&mut out, format!("concepts[{i}].relevance"), c.relevance);
    }

    for (i, c) in result.categories.iter().flatten().enumerate() {
        unit(&mut out, format!("categories[{i}].score"), c.score);
    }

    out
}

fn unit(out: &mut Vec<BoundViolation>, field: String, value: f64) {
    within(out, field, value, UNIT_RANGE);
}

fn polarity(out: &mut Vec<BoundViolation>, field: String, s: &Sentiment) {
    within(out, field, s.score, POLARITY_RANGE);
}

fn emotion(out: &mut Vec<BoundViolation>, prefix: &str, e: &Emotion) {
    for (name, score) in e.scores() {
        if let Some(v) = score {
            unit(out, format!("{prefix}.{name}"), v);
        }
    }
}

fn within(out: &mut Vec<BoundViolation>, field: String, value: f64, (min, max): (f64, f64)) {
    if !(min..=max).contains(&value) {
        out.push(BoundViolation {
            field,
            value,
            min,
            max,
        });
    }
}
