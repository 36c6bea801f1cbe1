//! Value model for inspected data
//!
//! [`Value`] is the tree every dump operates on: classification produces it,
//! flattening normalises it and rendering serializes it. Leaves the JSON data
//! model cannot hold (byte strings, opaque objects, non-finite floats) are
//! kept as-is until render time.

use crate::describe::Describe;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasher;

/// Mapping key
///
/// The key kinds a JSON object key can be derived from. Byte keys are decoded
/// to text during flattening.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// `null` key
    Null,
    /// Boolean key
    Bool(bool),
    /// Signed integer key
    Int(i64),
    /// Unsigned integer key
    UInt(u64),
    /// Text key
    Text(String),
    /// Raw byte-sequence key
    Bytes(Vec<u8>),
}

impl Key {
    /// Text used for this key in rendered output.
    ///
    /// Byte keys are decoded as UTF-8; invalid sequences are replaced with
    /// U+FFFD rather than failing the dump.
    pub fn to_text(&self) -> String {
        match self {
            Key::Null => "null".to_string(),
            Key::Bool(b) => b.to_string(),
            Key::Int(i) => i.to_string(),
            Key::UInt(u) => u.to_string(),
            Key::Text(s) => s.clone(),
            Key::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

/// A value JSON cannot represent, stringified at render time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    /// Type name of the original value
    pub type_name: String,
    /// Textual representation emitted by the renderer
    pub repr: String,
}

impl Opaque {
    /// Create an opaque leaf
    pub fn new(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            repr: repr.into(),
        }
    }

    /// Leaf for a nested describable object, shown by its [`Describe::repr`].
    ///
    /// Store it as an attribute to dump an object inside another one
    /// without classifying its members.
    pub fn of<T: Describe + ?Sized>(value: &T) -> Self {
        Self::new(value.type_name(), value.repr())
    }

    /// Leaf for any value with a `Debug` impl, shown by its `{:?}` text
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::new(std::any::type_name::<T>(), format!("{:?}", value))
    }
}

/// Inspected value tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point number (may be non-finite)
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Raw byte sequence
    Bytes(Vec<u8>),
    /// Insertion-ordered mapping
    Map(IndexMap<Key, Value>),
    /// Ordered sequence
    Seq(Vec<Value>),
    /// Fixed-size heterogeneous sequence
    Tuple(Vec<Value>),
    /// Unordered collection, kept in enumeration order
    Set(Vec<Value>),
    /// Non-primitive leaf
    Opaque(Opaque),
}

impl Value {
    /// Build a mapping from key/value pairs.
    ///
    /// Later pairs overwrite earlier ones with an equal key while keeping the
    /// first position.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this value is a mapping, sequence, tuple or set
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Map(_) | Value::Seq(_) | Value::Tuple(_) | Value::Set(_)
        )
    }

    /// Short name of the variant, used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Map(_) => "mapping",
            Value::Seq(_) => "sequence",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Borrow the mapping entries if this is a mapping
    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a text key in a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()
            .and_then(|map| map.get(&Key::Text(key.to_string())))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Opaque> for Value {
    fn from(value: Opaque) -> Self {
        Value::Opaque(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Seq(value)
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(value: IndexMap<Key, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64()
                        .map_or_else(|| Value::Text(n.to_string()), Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::Seq(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Key::Text(k.clone()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Byte-sequence wrapper
///
/// `Vec<u8>` converts to a sequence of integers; wrap it in `Bytes` to get a
/// byte-string value or key instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Bytes(value)
    }
}

/// Conversion into a [`Value`] tree
pub trait ToValue {
    /// Convert `self` into a value tree
    fn to_value(&self) -> Value;
}

/// Conversion into a mapping [`Key`]
pub trait ToKey {
    /// Convert `self` into a key
    fn to_key(&self) -> Key;
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }

            impl ToKey for $t {
                fn to_key(&self) -> Key {
                    Key::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::UInt(*self as u64)
                }
            }

            impl ToKey for $t {
                fn to_key(&self) -> Key {
                    Key::UInt(*self as u64)
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToKey for bool {
    fn to_key(&self) -> Key {
        Key::Bool(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToKey for char {
    fn to_key(&self) -> Key {
        Key::Text(self.to_string())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToKey for str {
    fn to_key(&self) -> Key {
        Key::Text(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToKey for String {
    fn to_key(&self) -> Key {
        Key::Text(self.clone())
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }
}

impl ToKey for Bytes {
    fn to_key(&self) -> Key {
        Key::Bytes(self.0.clone())
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToKey for Key {
    fn to_key(&self) -> Key {
        self.clone()
    }
}

impl ToValue for Opaque {
    fn to_value(&self) -> Value {
        Value::Opaque(self.clone())
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToKey + ?Sized> ToKey for &T {
    fn to_key(&self) -> Key {
        (**self).to_key()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue, S: BuildHasher> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<K: ToKey, V: ToValue, S: BuildHasher> ToValue for HashMap<K, V, S> {
    /// Entries are sorted by key so repeated dumps of the same map agree.
    fn to_value(&self) -> Value {
        let mut entries: Vec<(Key, Value)> = self
            .iter()
            .map(|(k, v)| (k.to_key(), v.to_value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries.into_iter().collect())
    }
}

impl<K: ToKey, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_key(), v.to_value())).collect())
    }
}

impl<K: ToKey, V: ToValue, S: BuildHasher> ToValue for IndexMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_key(), v.to_value())).collect())
    }
}

macro_rules! impl_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: ToValue),+> ToValue for ($($name,)+) {
            fn to_value(&self) -> Value {
                Value::Tuple(vec![$(self.$idx.to_value()),+])
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_to_text() {
        assert_eq!(Key::Null.to_text(), "null");
        assert_eq!(Key::Bool(true).to_text(), "true");
        assert_eq!(Key::Int(-3).to_text(), "-3");
        assert_eq!(Key::UInt(7).to_text(), "7");
        assert_eq!(Key::Text("a".into()).to_text(), "a");
        assert_eq!(Key::Bytes(b"raw".to_vec()).to_text(), "raw");
    }

    #[test]
    fn test_invalid_utf8_key_is_decoded_lossily() {
        let key = Key::Bytes(vec![b'a', 0xff, b'b']);
        assert_eq!(key.to_text(), "a\u{fffd}b");
    }

    #[test]
    fn test_map_overwrite_keeps_first_position() {
        let value = Value::map([("a", 1), ("b", 2), ("a", 3)]);
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().map(Key::to_text).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(value.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_container_detection() {
        assert!(Value::Seq(vec![]).is_container());
        assert!(Value::Set(vec![]).is_container());
        assert!(Value::Tuple(vec![]).is_container());
        assert!(Value::map(Vec::<(&str, i64)>::new()).is_container());
        assert!(!Value::Text("x".into()).is_container());
        assert!(!Value::Opaque(Opaque::new("T", "t")).is_container());
    }

    #[derive(Debug)]
    struct Endpoint {
        host: &'static str,
        port: u16,
    }

    #[test]
    fn test_opaque_from_debug() {
        let leaf = Opaque::debug(&Endpoint {
            host: "localhost",
            port: 8080,
        });
        assert_eq!(leaf.repr, "Endpoint { host: \"localhost\", port: 8080 }");
        assert!(leaf.type_name.ends_with("Endpoint"));
    }

    #[test]
    fn test_opaque_from_describe() {
        struct Handle;
        impl Describe for Handle {
            fn type_name(&self) -> &str {
                "Handle"
            }

            fn repr(&self) -> String {
                "<Handle #3>".to_string()
            }
        }

        let leaf = Opaque::of(&Handle);
        assert_eq!(leaf, Opaque::new("Handle", "<Handle #3>"));
        assert_eq!(
            Value::from(Opaque::of(&Handle)),
            Value::Opaque(Opaque::new("Handle", "<Handle #3>"))
        );
    }

    #[test]
    fn test_std_conversions() {
        assert_eq!(42u8.to_value(), Value::UInt(42));
        assert_eq!((-1i16).to_value(), Value::Int(-1));
        assert_eq!(Some("x").to_value(), Value::Text("x".into()));
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(
            (1, "two").to_value(),
            Value::Tuple(vec![Value::Int(1), Value::Text("two".into())])
        );
        assert_eq!(Bytes::from(&b"ab"[..]).to_value(), Value::Bytes(b"ab".to_vec()));
    }

    #[test]
    fn test_hash_map_conversion_is_sorted() {
        let mut map = HashMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mid", 3);
        let value = map.to_value();
        let keys: Vec<_> = value.as_map().unwrap().keys().map(Key::to_text).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::json!({"a": 1, "b": [true, null, 2.5], "c": u64::MAX});
        let value = Value::from(&json);
        assert_eq!(value.get("a"), Some(&Value::Int(1)));
        assert_eq!(
            value.get("b"),
            Some(&Value::Seq(vec![Value::Bool(true), Value::Null, Value::Float(2.5)]))
        );
        assert_eq!(value.get("c"), Some(&Value::UInt(u64::MAX)));
    }
}
