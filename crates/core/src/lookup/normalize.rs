//! # Answer Normalization
//!
//! Completion output is untrusted. It is accepted only in one of two shapes:
//!
//! - `{"error": ...}` - the term is not a technology
//! - `{"name": "...", "year": 2010, "description": "...", "link": "..."}`
//!
//! Anything else is rejected with an [`AnswerError`].

use crate::catalog::TechnologyRecord;
use crate::error::AnswerError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// A completion answer that passed the shape check
#[derive(Debug, Clone, PartialEq)]
pub enum AiAnswer {
    Technology(TechnologyRecord),
    /// Carries the model's stated reason
    Unrecognized(String),
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern is valid"))
}

/// Remove Markdown code-fence markers and surrounding whitespace
pub fn strip_code_fences(raw: &str) -> String {
    fence_regex().replace_all(raw, "").trim().to_string()
}

/// Strip fences, parse JSON, and check the answer against the accepted shapes
pub fn parse_answer(raw: &str) -> Result<AiAnswer, AnswerError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)?;

    let Value::Object(map) = value else {
        return Err(AnswerError::NotAnObject);
    };

    if let Some(reason) = map.get("error") {
        let reason = match reason {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(AiAnswer::Unrecognized(reason));
    }

    let name = match map.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => return Err(AnswerError::MissingName),
    };

    Ok(AiAnswer::Technology(TechnologyRecord {
        name,
        year_created: year_field(&map)?,
        description: optional_string(&map, "description")?.unwrap_or_default(),
        link: optional_url(&map, "link")?,
        logo: optional_url(&map, "logo")?,
    }))
}

/// Integral floats at or above this magnitude are not exact in `f64`
const MAX_FLOAT_YEAR: f64 = 9.0e15;

fn year_field(map: &Map<String, Value>) -> Result<Option<i64>, AnswerError> {
    let invalid = AnswerError::InvalidField {
        field: "year",
        expected: "a whole number",
    };
    match map.get("year") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(year) => Ok(Some(year)),
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < MAX_FLOAT_YEAR => Ok(Some(f as i64)),
                _ => Err(invalid),
            },
        },
        Some(_) => Err(invalid),
    }
}

/// Missing, null and blank strings all read as `None`
fn optional_string(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, AnswerError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(AnswerError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

/// Like [`optional_string`], but only `http`/`https` URLs are kept.
///
/// Other schemes (`javascript:`, `data:`, ...) are dropped so they never reach
/// the catalog or an `href`.
fn optional_url(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, AnswerError> {
    let url = optional_string(map, field)?;
    Ok(url.filter(|u| {
        let ok = is_web_url(u);
        if !ok {
            tracing::warn!(field, url = %u, "Dropping non-http URL from completion answer");
        }
        ok
    }))
}

/// True for absolute `http://` and `https://` URLs
pub fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
