//! Structured tier: find the JSON the model was asked for and read packages out of it.

use serde_json::{Map, Value};
use std::sync::OnceLock;

use regex::Regex;

use super::hashtags::{default_hashtags, strip_marker};
use super::{fallback_description, fallback_title, synthetic, ContentPackage};

/// Packages from the first JSON object (single option) or array (several
/// options) in `raw`. `None` when nothing decodes to at least one object.
pub fn parse(raw: &str, topic: &str, option_count: usize) -> Option<Vec<ContentPackage>> {
    let objects = decode_objects(raw, option_count > 1)?;

    if objects.len() > option_count {
        log::debug!(
            "Model returned {} packages, keeping the first {}",
            objects.len(),
            option_count
        );
    }

    let mut packages: Vec<ContentPackage> = objects
        .iter()
        .take(option_count)
        .map(|obj| package_from_object(obj, topic))
        .collect();

    if packages.len() < option_count {
        log::debug!(
            "Model returned {} of {} packages, padding with alternatives",
            packages.len(),
            option_count
        );
    }
    while packages.len() < option_count {
        let position = packages.len() + 1;
        packages.push(synthetic::alternative(topic, position));
    }

    Some(packages)
}

/// Try each candidate span in turn; the first that yields objects wins.
fn decode_objects(raw: &str, want_array: bool) -> Option<Vec<Map<String, Value>>> {
    if want_array {
        // Prose like "[3] plans" can precede the real array, so walk every `[`.
        let mut from = 0;
        while let Some(offset) = raw[from..].find('[') {
            let rest = &raw[from + offset..];
            match balanced_span(rest, '[', ']') {
                Some(span) => {
                    if let Some(objects) = decode(span).map(objects_of).filter(|o| !o.is_empty()) {
                        return Some(objects);
                    }
                }
                None => {
                    // Truncated array: keep whatever objects were completed.
                    let salvaged = salvage_objects(rest);
                    if !salvaged.is_empty() {
                        log::debug!("Salvaged {} objects from a truncated array", salvaged.len());
                        return Some(salvaged);
                    }
                }
            }
            from += offset + 1;
        }
    } else if let Some(span) = balanced_span(raw, '{', '}') {
        if let Some(objects) = decode(span).map(objects_of).filter(|o| !o.is_empty()) {
            return Some(objects);
        }
    }

    if let Some(objects) = decode(raw).map(objects_of).filter(|o| !o.is_empty()) {
        return Some(objects);
    }

    // Asked for an array, got a lone object wrapped in prose.
    if want_array {
        if let Some(span) = balanced_span(raw, '{', '}') {
            return decode(span).map(objects_of).filter(|o| !o.is_empty());
        }
    }

    None
}

/// Parse as JSON. Retries with code fences and trailing commas removed, then
/// with single quotes read as double quotes.
pub(crate) fn decode(candidate: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(candidate.trim()) {
        return Some(v);
    }

    static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_COMMA_RE.get_or_init(|| {
        Regex::new(r",\s*([}\]])").expect("trailing comma regex should compile")
    });

    let stripped = candidate.replace("```json", "").replace("```", "");
    let fixed = re.replace_all(stripped.trim(), "$1");
    if let Ok(v) = serde_json::from_str::<Value>(&fixed) {
        return Some(v);
    }

    serde_json::from_str::<Value>(&fixed.replace('\'', "\"")).ok()
}

fn objects_of(value: Value) -> Vec<Map<String, Value>> {
    match value {
        Value::Object(obj) => vec![obj],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(obj) => Some(obj),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// First `open ... close` span with balanced nesting. Brackets inside JSON
/// string literals do not count.
pub(crate) fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                let end = start + i + ch.len_utf8();
                return Some(&text[start..end]);
            }
        }
    }

    None
}

/// Complete objects that follow the first `[` of an array cut off mid-way.
fn salvage_objects(text: &str) -> Vec<Map<String, Value>> {
    let Some(open) = text.find('[') else {
        return Vec::new();
    };

    let mut objects = Vec::new();
    let mut rest = &text[open + 1..];
    loop {
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if !trimmed.starts_with('{') {
            break;
        }
        let Some(span) = balanced_span(trimmed, '{', '}') else {
            break;
        };
        match decode(span) {
            Some(Value::Object(obj)) => objects.push(obj),
            _ => break,
        }
        rest = &trimmed[span.len()..];
    }
    objects
}

/// Read a key, falling back to a case-insensitive match.
fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| {
        obj.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn non_blank_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

pub(crate) fn package_from_object(obj: &Map<String, Value>, topic: &str) -> ContentPackage {
    let title = non_blank_str(field(obj, "title")).unwrap_or_else(|| fallback_title(topic));
    let description =
        non_blank_str(field(obj, "description")).unwrap_or_else(|| fallback_description(topic));

    let hashtags = match field(obj, "hashtags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(strip_marker(s)),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|tag| !tag.is_empty())
            .collect(),
        _ => default_hashtags(topic),
    };

    ContentPackage {
        title,
        description,
        hashtags,
    }
}
