//! Dump entry points
//!
//! Every entry point runs the same pipeline: classify (objects only), then
//! flatten, then render.

use crate::bucket::classify;
use crate::describe::Describe;
use crate::error::Result;
use crate::flatten::flatten;
use crate::limits::ReprLimits;
use crate::render::{render, RenderOptions};
use crate::value::Value;
use std::io::{self, Write};

/// Options for a dump call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Rendering configuration
    pub render: RenderOptions,
}

impl DumpOptions {
    /// Options with the given representation limits
    pub fn with_limits(limits: ReprLimits) -> Self {
        Self {
            render: RenderOptions::with_limits(limits),
        }
    }
}

/// Build the flattened tree for `value` without rendering it.
///
/// Containers are flattened directly; anything else is classified first.
pub fn structure<T: Describe + ?Sized>(value: &T) -> Value {
    match value.as_container() {
        Some(container) => {
            tracing::trace!(target: "anydump", kind = container.kind(), "flattening container");
            flatten(container)
        }
        None => {
            tracing::trace!(target: "anydump", type_name = value.type_name(), "classifying members");
            flatten(classify(value))
        }
    }
}

/// Render `value` to a string
pub fn dump_string<T: Describe + ?Sized>(value: &T, options: &DumpOptions) -> Result<String> {
    render(&structure(value), &options.render)
}

/// Render `value` and write it, followed by a newline, to `writer`
pub fn dump_to<W, T>(writer: &mut W, value: &T, options: &DumpOptions) -> Result<()>
where
    W: Write + ?Sized,
    T: Describe + ?Sized,
{
    let text = dump_string(value, options)?;
    writeln!(writer, "{}", text)?;
    writer.flush()?;
    Ok(())
}

/// Render `value` to standard output with explicit options.
///
/// Never fails: a write error is logged and dropped.
pub fn dump_with<T: Describe + ?Sized>(value: &T, options: &DumpOptions) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(err) = dump_to(&mut handle, value, options) {
        tracing::warn!(target: "anydump", error = %err, "failed to write dump to stdout");
    }
}

/// Render `value` to standard output with default options
pub fn dump<T: Describe + ?Sized>(value: &T) {
    dump_with(value, &DumpOptions::default());
}
