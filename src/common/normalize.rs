use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block stripped after canonical decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Canonical comparison key for free-text attribute values.
///
/// Lowercases, decomposes (NFD), drops combining diacritical marks, collapses
/// whitespace runs to a single space and trims. `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a JSON attribute value. Null or absent values yield an empty string.
pub fn normalize_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => normalize(s),
        Some(other) => normalize(&other.to_string()),
    }
}

/// Display text of an attribute value, without normalization.
/// Null or absent values yield an empty string.
pub(crate) fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
