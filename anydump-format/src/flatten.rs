//! Flattening of container trees
//!
//! After flattening every mapping key is text and every sequence-like
//! container (sequence, tuple, set) is an ordered sequence. Leaves are left
//! untouched for the renderer to stringify.

use crate::value::{Key, Value};
use indexmap::IndexMap;

/// Normalise a value into a container-only tree with text keys.
///
/// Keys that collide after decoding keep the first position and the last
/// value.
pub fn flatten(value: Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(flatten_map(map)),
        Value::Seq(items) | Value::Tuple(items) | Value::Set(items) => {
            Value::Seq(items.into_iter().map(flatten).collect())
        }
        leaf => leaf,
    }
}

fn flatten_map(map: IndexMap<Key, Value>) -> IndexMap<Key, Value> {
    let mut out = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let key = match key {
            Key::Text(text) => Key::Text(text),
            other => Key::Text(other.to_text()),
        };
        out.insert(key, flatten(value));
    }
    out
}

/// Whether `value` is already in flattened form
pub fn is_flat(value: &Value) -> bool {
    match value {
        Value::Map(map) => map
            .iter()
            .all(|(k, v)| matches!(k, Key::Text(_)) && is_flat(v)),
        Value::Seq(items) => items.iter().all(is_flat),
        Value::Tuple(_) | Value::Set(_) => false,
        _ => true,
    }
}
