//! Member classification
//!
//! Members of a described object are sorted into four fixed buckets. The
//! bucket order is part of the output format: methods first, then
//! underscore-prefixed members, then everything else, then failures.

use crate::describe::{Describe, Member, MemberError};
use crate::value::{Key, Opaque, Value};
use indexmap::IndexMap;
use std::panic::{self, AssertUnwindSafe};

/// Width every bucket label is padded to with `*`
pub const LABEL_WIDTH: usize = 90;

/// Classification bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Invocable members
    Methods,
    /// Data members whose name starts with `_`
    Underscore,
    /// All other data members
    Others,
    /// Members whose resolution failed
    Failures,
}

impl Bucket {
    /// All buckets in output order
    pub const ALL: [Bucket; 4] = [
        Bucket::Methods,
        Bucket::Underscore,
        Bucket::Others,
        Bucket::Failures,
    ];

    /// Unpadded label
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Methods => "00_METHODS",
            Bucket::Underscore => "01_UNDESCORE",
            Bucket::Others => "02_OTHERS",
            Bucket::Failures => "03_EXCEPTIONS",
        }
    }

    /// Label used as the bucket's key in the dumped tree
    pub fn label(&self) -> String {
        format!("{:*<width$}", self.name(), width = LABEL_WIDTH)
    }

    /// Bucket for a successfully resolved member
    pub fn for_member(name: &str, member: &Member) -> Bucket {
        if member.is_invocable() {
            Bucket::Methods
        } else if name.starts_with('_') {
            Bucket::Underscore
        } else {
            Bucket::Others
        }
    }
}

/// Resolve one member, converting a panic in the accessor into an error.
fn resolve<T: Describe + ?Sized>(value: &T, name: &str) -> Result<Member, MemberError> {
    match panic::catch_unwind(AssertUnwindSafe(|| value.member(name))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Err(MemberError::Panicked(message))
        }
    }
}

/// Classify every member of `value` into the four buckets.
///
/// Member names are sorted and de-duplicated first. Each member is resolved
/// exactly once; a failure is stored under [`Bucket::Failures`] as an opaque
/// leaf holding the error text. The result always holds all four bucket
/// labels in order, even when a bucket is empty.
pub fn classify<T: Describe + ?Sized>(value: &T) -> Value {
    let mut buckets: IndexMap<Bucket, IndexMap<Key, Value>> = Bucket::ALL
        .iter()
        .map(|bucket| (*bucket, IndexMap::new()))
        .collect();

    let mut names = value.member_names();
    names.sort();
    names.dedup();

    let owner = value.type_name().to_string();
    for name in names {
        let (bucket, leaf) = match resolve(value, &name) {
            Ok(member) => {
                let bucket = Bucket::for_member(&name, &member);
                let leaf = match member {
                    Member::Method(method) => {
                        Value::Opaque(Opaque::new("method", method.repr(&owner)))
                    }
                    Member::Attribute(attr) => attr,
                };
                (bucket, leaf)
            }
            Err(err) => {
                tracing::debug!(
                    target: "anydump",
                    member = %name,
                    owner = %owner,
                    error = %err,
                    "member introspection failed"
                );
                (
                    Bucket::Failures,
                    Value::Opaque(Opaque::new("MemberError", err.to_string())),
                )
            }
        };
        if let Some(entries) = buckets.get_mut(&bucket) {
            entries.insert(Key::Text(name), leaf);
        }
    }

    Value::Map(
        buckets
            .into_iter()
            .map(|(bucket, entries)| (Key::Text(bucket.label()), Value::Map(entries)))
            .collect(),
    )
}
