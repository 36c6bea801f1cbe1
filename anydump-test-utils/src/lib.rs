//! anydump Test Utilities
//!
//! This crate provides shared fixtures and helpers for the anydump tests.

use anydump_format::{describe, Bucket, Describe, Member, MemberError, Object, Value};
use serde_json::json;

/// The nested container used throughout the tests:
/// `{"a": 1, "b": [1, 2, {"c": 3}]}`
pub fn sample_document() -> serde_json::Value {
    json!({"a": 1, "b": [1, 2, {"c": 3}]})
}

/// A plain struct described with the `describe!` macro
#[derive(Debug, Clone)]
pub struct Gadget {
    /// Display name
    pub name: String,
    /// Sizes in millimetres
    pub dims: Vec<u32>,
    /// Internal counter, listed under the underscore bucket
    pub _revision: u64,
}

describe!(Gadget {
    fields: [name, dims, _revision],
    methods: [volume = "(&self) -> u64", _bump = "(&mut self)"],
});

impl Gadget {
    /// A gadget with fixed contents
    pub fn sample() -> Self {
        Self {
            name: "widget".to_string(),
            dims: vec![10, 20, 30],
            _revision: 4,
        }
    }
}

/// A type whose `reading` member fails the way a property raising an error
/// would, and which lists its members in reverse alphabetical order.
#[derive(Debug, Default)]
pub struct Sensor;

impl Describe for Sensor {
    fn type_name(&self) -> &str {
        "Sensor"
    }

    fn member_names(&self) -> Vec<String> {
        ["reading", "calibrate", "_offset", "id"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn member(&self, name: &str) -> Result<Member, MemberError> {
        match name {
            "id" => Ok(Member::attribute(7)),
            "_offset" => Ok(Member::attribute(-0.5)),
            "calibrate" => Ok(Member::Method(anydump_format::Method::new(
                "calibrate",
                "(&mut self, f64)",
            ))),
            "reading" => Err(MemberError::failed("ValueError: boom")),
            other => Err(MemberError::NotFound(other.to_string())),
        }
    }
}

/// An attribute bag with one member in each bucket
pub fn mixed_object() -> Object {
    Object::new("Mixed")
        .attribute("visible", "yes")
        .attribute("_hidden", Value::Null)
        .method("run", "(&self)")
        .failing("broken", "boom")
}

/// Byte offsets of each bucket label in rendered text, in bucket order.
///
/// Missing labels are reported as `None`.
pub fn label_positions(text: &str) -> Vec<Option<usize>> {
    Bucket::ALL
        .iter()
        .map(|bucket| text.find(&bucket.label()))
        .collect()
}
