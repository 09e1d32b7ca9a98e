//! Helpers for moving filter values between single- and multi-select controls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::code_table::CodeDescription;

/// A filter value as held in a filter payload: either one code or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A single selected code.
    Single(String),
    /// Several selected codes.
    Many(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

/// Presents a value as a list for a multi-select control.
///
/// Missing or empty single values become an empty list.
pub fn wrap_filter_value(value: Option<&FilterValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(FilterValue::Single(s)) if s.is_empty() => Vec::new(),
        Some(FilterValue::Single(s)) => vec![s.clone()],
        Some(FilterValue::Many(v)) => v.clone(),
    }
}

/// Presents a value as one code for a single-select control.
///
/// Lists yield their first element; anything missing yields `""`.
pub fn unwrap_filter_value(value: Option<&FilterValue>) -> String {
    match value {
        None => String::new(),
        Some(FilterValue::Single(s)) => s.clone(),
        Some(FilterValue::Many(v)) => v.first().cloned().unwrap_or_default(),
    }
}

/// Projects arbitrary JSON records onto code/description pairs.
///
/// Missing fields map to an empty string; non-string fields use their JSON
/// text.
pub fn map_to_code_description(
    items: &[Value],
    code_field: &str,
    description_field: &str,
) -> Vec<CodeDescription> {
    items
        .iter()
        .map(|item| CodeDescription {
            code: field_text(item, code_field),
            description: field_text(item, description_field),
        })
        .collect()
}

fn field_text(item: &Value, field: &str) -> String {
    match item.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
