//! `tracing` integration

/// Characters of a source path kept by [`short_path`]
pub const SHORT_PATH_CHARS: usize = 20;

/// Last [`SHORT_PATH_CHARS`] characters of a source path.
///
/// Used to tag trace events with a compact origin.
pub fn short_path(path: &str) -> &str {
    let count = path.chars().count();
    if count <= SHORT_PATH_CHARS {
        return path;
    }
    match path.char_indices().nth(count - SHORT_PATH_CHARS) {
        Some((idx, _)) => &path[idx..],
        None => path,
    }
}

/// Dump a value as a `debug` event on the `anydump` target.
///
/// The event carries the call site as `origin` (shortened file path) and
/// `line`. Nothing is rendered unless the event is enabled.
///
/// ```
/// use anydump_format::trace_dump;
///
/// let scores = vec![1, 2, 3];
/// trace_dump!(scores);
/// ```
#[macro_export]
macro_rules! trace_dump {
    ($value:expr) => {
        $crate::trace_dump!($value, &$crate::DumpOptions::default())
    };
    ($value:expr, $options:expr) => {{
        if $crate::__private::tracing::enabled!(
            target: "anydump",
            $crate::__private::tracing::Level::DEBUG
        ) {
            match $crate::dump_string(&$value, $options) {
                Ok(text) => $crate::__private::tracing::debug!(
                    target: "anydump",
                    origin = $crate::short_path(file!()),
                    line = line!(),
                    "\n{}",
                    text
                ),
                Err(err) => $crate::__private::tracing::warn!(
                    target: "anydump",
                    origin = $crate::short_path(file!()),
                    line = line!(),
                    error = %err,
                    "failed to render dump"
                ),
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    /// Shared buffer handed to the fmt subscriber as its writer
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture<F: FnOnce()>(level: Level, f: F) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(level)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.text()
    }

    #[test]
    fn test_short_path_keeps_tail() {
        let path = "/home/dev/project/crates/anydump-format/src/trace.rs";
        let short = short_path(path);
        assert_eq!(short.chars().count(), SHORT_PATH_CHARS);
        assert_eq!(short, "-format/src/trace.rs");
        assert!(path.ends_with(short));
    }

    #[test]
    fn test_short_path_leaves_short_paths_alone() {
        assert_eq!(short_path("src/lib.rs"), "src/lib.rs");
        assert_eq!(short_path(""), "");
    }

    #[test]
    fn test_short_path_respects_char_boundaries() {
        let path = "répertoire/ünïcödé/módulo_de_prueba.rs";
        let short = short_path(path);
        assert_eq!(short.chars().count(), SHORT_PATH_CHARS);
        assert!(path.ends_with(short));
    }

    #[test]
    fn test_trace_dump_without_subscriber() {
        let values = vec![1, 2, 3];
        crate::trace_dump!(values);
        crate::trace_dump!(values, &crate::DumpOptions::default());
    }

    #[test]
    fn test_trace_dump_emits_debug_event() {
        let mut call_line = 0;
        let output = capture(Level::DEBUG, || {
            call_line = line!() + 1;
            crate::trace_dump!(vec![1, 2]);
        });
        assert!(output.contains("DEBUG"), "{output}");
        assert!(output.contains("anydump:"), "{output}");
        assert!(output.contains("origin=\""), "{output}");
        assert!(output.contains("src/trace.rs\""), "{output}");
        assert!(output.contains(&format!("line={call_line}")), "{output}");
        assert!(output.contains("[\n  1,\n  2\n]"), "{output}");
    }

    #[test]
    fn test_trace_dump_honours_options() {
        let options = crate::DumpOptions::with_limits(crate::ReprLimits {
            max_sequence_items: 1,
            ..crate::ReprLimits::default()
        });
        let output = capture(Level::DEBUG, || {
            crate::trace_dump!(vec![7, 8, 9], &options);
        });
        assert!(output.contains("[\n  7,\n  \"... (2 more)\"\n]"), "{output}");
    }

    #[test]
    fn test_trace_dump_is_silent_above_debug() {
        let output = capture(Level::INFO, || {
            crate::trace_dump!(vec![1, 2]);
        });
        assert!(output.is_empty(), "{output}");
    }
}
