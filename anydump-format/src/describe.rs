//! The `Describe` capability
//!
//! Values opt into structural dumping by implementing [`Describe`]. A
//! describable value is either a container, which is flattened as-is, or an
//! object exposing named members that are classified into buckets.
//!
//! Member resolution is fallible: [`Describe::member`] returns a
//! [`MemberError`] for members that cannot be read, and the classifier
//! records that error instead of aborting the dump.

use crate::value::{ToKey, ToValue, Value};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasher;
use thiserror::Error;

/// Failure to resolve a single member
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// The value does not expose a member with this name.
    #[error("object has no member '{0}'")]
    NotFound(String),
    /// Reading the member failed.
    #[error("{0}")]
    Failed(String),
    /// Reading the member panicked.
    #[error("member access panicked: {0}")]
    Panicked(String),
}

impl MemberError {
    /// Wrap any displayable error as a failed member access
    pub fn failed(err: impl fmt::Display) -> Self {
        MemberError::Failed(err.to_string())
    }
}

/// Invocable member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Member name
    pub name: String,
    /// Human-readable signature, e.g. `(&self) -> usize`
    pub signature: String,
}

impl Method {
    /// Create a method descriptor
    pub fn new(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
        }
    }

    /// Textual form used as the method's leaf in a dump
    pub fn repr(&self, owner: &str) -> String {
        format!("<method {}::{}{}>", owner, self.name, self.signature)
    }
}

/// A resolved member
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Callable member
    Method(Method),
    /// Plain data member
    Attribute(Value),
}

impl Member {
    /// Resolve a data member from anything convertible to a [`Value`]
    pub fn attribute(value: impl ToValue) -> Self {
        Member::Attribute(value.to_value())
    }

    /// Whether this member can be invoked
    pub fn is_invocable(&self) -> bool {
        matches!(self, Member::Method(_))
    }
}

/// Structural introspection capability
///
/// All methods have defaults, so a type can implement only the parts it
/// needs. Containers override [`Describe::as_container`]; objects override
/// [`Describe::member_names`] and [`Describe::member`].
pub trait Describe {
    /// Name of the described type
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The value as a container tree, if it is a mapping, sequence or set
    fn as_container(&self) -> Option<Value> {
        None
    }

    /// Names of all members reachable on this value
    fn member_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Resolve the current value of a member
    fn member(&self, name: &str) -> Result<Member, MemberError> {
        Err(MemberError::NotFound(name.to_string()))
    }

    /// Default textual representation.
    ///
    /// Includes the value's address, so it differs between runs.
    fn repr(&self) -> String {
        format!("<{} object at {:p}>", self.type_name(), self)
    }
}

impl Describe for Value {
    fn as_container(&self) -> Option<Value> {
        self.is_container().then(|| self.clone())
    }
}

impl Describe for serde_json::Value {
    fn as_container(&self) -> Option<Value> {
        match self {
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Some(self.to_value()),
            _ => None,
        }
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn as_container(&self) -> Option<Value> {
        (**self).as_container()
    }

    fn member_names(&self) -> Vec<String> {
        (**self).member_names()
    }

    fn member(&self, name: &str) -> Result<Member, MemberError> {
        (**self).member(name)
    }

    fn repr(&self) -> String {
        (**self).repr()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn as_container(&self) -> Option<Value> {
        (**self).as_container()
    }

    fn member_names(&self) -> Vec<String> {
        (**self).member_names()
    }

    fn member(&self, name: &str) -> Result<Member, MemberError> {
        (**self).member(name)
    }

    fn repr(&self) -> String {
        (**self).repr()
    }
}

macro_rules! impl_container {
    ($([$($gen:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($gen)*> Describe for $ty {
                fn as_container(&self) -> Option<Value> {
                    Some(self.to_value())
                }
            }
        )*
    };
}

impl_container!(
    [T: ToValue] [T],
    [T: ToValue] Vec<T>,
    [T: ToValue, const N: usize] [T; N],
    [T: ToValue] BTreeSet<T>,
    [T: ToValue, S: BuildHasher] HashSet<T, S>,
    [K: ToKey, V: ToValue] BTreeMap<K, V>,
    [K: ToKey, V: ToValue, S: BuildHasher] HashMap<K, V, S>,
    [K: ToKey, V: ToValue, S: BuildHasher] IndexMap<K, V, S>,
    [A: ToValue, B: ToValue] (A, B),
    [A: ToValue, B: ToValue, C: ToValue] (A, B, C),
);

type Getter = Box<dyn Fn() -> Result<Value, MemberError>>;

enum Slot {
    Attribute(Value),
    Method(String),
    Getter(Getter),
}

/// Dynamic attribute bag
///
/// Useful for dumping ad-hoc records and for exercising the classifier with
/// members that fail or panic on access.
pub struct Object {
    type_name: String,
    slots: IndexMap<String, Slot>,
}

impl Object {
    /// Create an empty object reporting the given type name
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: IndexMap::new(),
        }
    }

    /// Add a data member
    pub fn attribute(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.slots
            .insert(name.into(), Slot::Attribute(value.to_value()));
        self
    }

    /// Add an invocable member with the given signature
    pub fn method(mut self, name: impl Into<String>, signature: impl Into<String>) -> Self {
        self.slots.insert(name.into(), Slot::Method(signature.into()));
        self
    }

    /// Add a member computed on every access
    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn() -> Result<Value, MemberError> + 'static,
    {
        self.slots.insert(name.into(), Slot::Getter(Box::new(getter)));
        self
    }

    /// Add a member whose access always fails with `error`
    pub fn failing(self, name: impl Into<String>, error: impl fmt::Display) -> Self {
        let message = error.to_string();
        self.getter(name, move || Err(MemberError::Failed(message.clone())))
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the object has no members
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type_name", &self.type_name)
            .field("members", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Describe for Object {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn member_names(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }

    fn member(&self, name: &str) -> Result<Member, MemberError> {
        match self.slots.get(name) {
            Some(Slot::Attribute(value)) => Ok(Member::Attribute(value.clone())),
            Some(Slot::Method(signature)) => Ok(Member::Method(Method::new(name, signature.as_str()))),
            Some(Slot::Getter(getter)) => getter().map(Member::Attribute),
            None => Err(MemberError::NotFound(name.to_string())),
        }
    }
}

/// Implement [`Describe`] for a struct from its field and method names.
///
/// Fields must implement [`ToValue`].
///
/// ```
/// use anydump_format::{describe, Describe};
///
/// struct Point {
///     x: i64,
///     y: i64,
///     _hits: u32,
/// }
///
/// describe!(Point {
///     fields: [x, y, _hits],
///     methods: [norm = "(&self) -> f64"],
/// });
///
/// let p = Point { x: 3, y: 4, _hits: 0 };
/// assert_eq!(p.member_names().len(), 4);
/// ```
#[macro_export]
macro_rules! describe {
    ($ty:ty {
        fields: [$($field:ident),* $(,)?],
        methods: [$($method:ident = $sig:literal),* $(,)?] $(,)?
    }) => {
        impl $crate::Describe for $ty {
            fn member_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![
                    $(::std::string::String::from(stringify!($field)),)*
                    $(::std::string::String::from(stringify!($method)),)*
                ]
            }

            fn member(
                &self,
                name: &str,
            ) -> ::std::result::Result<$crate::Member, $crate::MemberError> {
                $(
                    if name == stringify!($field) {
                        return Ok($crate::Member::attribute(&self.$field));
                    }
                )*
                $(
                    if name == stringify!($method) {
                        return Ok($crate::Member::Method($crate::Method::new(
                            stringify!($method),
                            $sig,
                        )));
                    }
                )*
                Err($crate::MemberError::NotFound(name.to_string()))
            }
        }
    };
}
