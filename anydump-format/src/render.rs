//! Rendering of flattened trees as indented JSON text

use crate::error::Result;
use crate::limits::ReprLimits;
use crate::value::Value;
use serde_json::{Map, Number};

/// Marker appended to truncated output
pub const ELLIPSIS: &str = "...";

/// Rendering configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Representation size limits
    pub limits: ReprLimits,
}

impl RenderOptions {
    /// Options with the given limits
    pub fn with_limits(limits: ReprLimits) -> Self {
        Self { limits }
    }
}

/// Render a value as JSON text indented by two spaces.
///
/// Values outside the JSON data model are stringified rather than rejected,
/// so rendering a [`Value`] never fails on content.
pub fn render(value: &Value, options: &RenderOptions) -> Result<String> {
    let json = to_json(value, options);
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Convert a value into a JSON tree, applying the stringify fallback and
/// the representation limits.
pub fn to_json(value: &Value, options: &RenderOptions) -> serde_json::Value {
    let limits = &options.limits;
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::UInt(u) => serde_json::Value::Number((*u).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(float_repr(*f))),
        Value::Text(text) => serde_json::Value::String(truncate_chars(text, limits.max_text_chars)),
        Value::Bytes(bytes) => serde_json::Value::String(bytes_repr(bytes, limits.max_bytes)),
        Value::Opaque(opaque) => {
            serde_json::Value::String(truncate_chars(&opaque.repr, limits.max_object_chars))
        }
        Value::Map(map) => {
            let mut out = Map::new();
            for (key, entry) in map.iter().take(limits.max_mapping_entries) {
                out.insert(key.to_text(), to_json(entry, options));
            }
            let hidden = map.len().saturating_sub(limits.max_mapping_entries);
            if hidden > 0 {
                out.insert(
                    marker_key(&out),
                    serde_json::Value::String(format!("{} more entries", hidden)),
                );
            }
            serde_json::Value::Object(out)
        }
        Value::Seq(items) | Value::Tuple(items) | Value::Set(items) => {
            let mut out: Vec<serde_json::Value> = items
                .iter()
                .take(limits.max_sequence_items)
                .map(|item| to_json(item, options))
                .collect();
            let hidden = items.len().saturating_sub(limits.max_sequence_items);
            if hidden > 0 {
                out.push(serde_json::Value::String(format!(
                    "{} ({} more)",
                    ELLIPSIS, hidden
                )));
            }
            serde_json::Value::Array(out)
        }
    }
}

/// Truncation key that does not collide with a rendered entry.
///
/// Starts at [`ELLIPSIS`] and grows by one `.` while the key is taken.
fn marker_key(out: &Map<String, serde_json::Value>) -> String {
    let mut key = ELLIPSIS.to_string();
    while out.contains_key(&key) {
        key.push('.');
    }
    key
}

/// Textual form of a float JSON cannot hold
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_sign_positive() {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// Keep at most `max` characters, marking the cut with [`ELLIPSIS`].
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}{}", &text[..idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Byte-string literal form, e.g. `b'ab\x00'`
pub fn bytes_repr(bytes: &[u8], max: usize) -> String {
    let shown = &bytes[..bytes.len().min(max)];
    let mut out = String::with_capacity(shown.len() + 3);
    out.push_str("b'");
    for &byte in shown {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{:02x}", byte)),
        }
    }
    out.push('\'');
    if shown.len() < bytes.len() {
        out.push_str(ELLIPSIS);
    }
    out
}
