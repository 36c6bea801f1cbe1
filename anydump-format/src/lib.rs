//! anydump format - structural dumper core
//!
//! Renders any [`Describe`] value as an indented JSON tree, tolerating
//! failures on individual members. It includes:
//!
//! - The value model ([`Value`], [`Key`], [`Opaque`]) and conversions
//! - The [`Describe`] capability and the [`Object`] attribute bag
//! - Member classification into fixed buckets
//! - Flattening and rendering with explicit representation limits
//! - Error types
//! - `tracing` helpers
//!
//! ```
//! use anydump_format::{dump_string, DumpOptions, Object};
//!
//! let obj = Object::new("Connection")
//!     .attribute("host", "localhost")
//!     .method("close", "(&mut self)")
//!     .failing("peer", "not connected");
//!
//! let text = dump_string(&obj, &DumpOptions::default()).unwrap();
//! assert!(text.contains("\"peer\": \"not connected\""));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bucket;
pub mod describe;
pub mod dump;
pub mod error;
pub mod flatten;
pub mod limits;
pub mod render;
pub mod trace;
pub mod value;

// Re-export commonly used types
pub use bucket::{classify, Bucket};
pub use describe::{Describe, Member, MemberError, Method, Object};
pub use dump::{dump, dump_string, dump_to, dump_with, structure, DumpOptions};
pub use error::{DumpError, Result};
pub use flatten::flatten;
pub use limits::ReprLimits;
pub use render::{render, RenderOptions};
pub use trace::short_path;
pub use value::{Bytes, Key, Opaque, ToKey, ToValue, Value};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
