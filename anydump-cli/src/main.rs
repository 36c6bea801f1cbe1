//! anydump CLI - Command-line tool for structural dumps
//!
//! This binary provides command-line interfaces for:
//! - dump: render a JSON document (or every NDJSON line) as an indented tree
//! - limits: print the effective representation limits as TOML

use anydump_format::{dump_to, DumpError, DumpOptions, ReprLimits};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "anydump")]
#[command(about = "Failure-tolerant structural dumper")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON document as an indented tree
    ///
    /// Examples:
    ///   anydump dump data.json
    ///   anydump dump events.ndjson --ndjson --max-text 80
    ///   cat data.json | anydump dump -o tree.txt
    Dump {
        /// Input file (JSON or NDJSON); reads stdin when omitted or "-"
        input: Option<PathBuf>,
        /// Output file; writes stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Treat input as NDJSON and dump each line separately
        #[arg(long)]
        ndjson: bool,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Print the effective representation limits as TOML
    Limits {
        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(Args, Debug, Default)]
struct LimitArgs {
    /// TOML file with representation limits; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum characters of an opaque object's representation
    #[arg(long)]
    max_object: Option<usize>,
    /// Maximum entries rendered per mapping
    #[arg(long)]
    max_mapping: Option<usize>,
    /// Maximum elements rendered per sequence
    #[arg(long)]
    max_sequence: Option<usize>,
    /// Maximum characters rendered per string
    #[arg(long)]
    max_text: Option<usize>,
    /// Maximum bytes rendered per byte string
    #[arg(long)]
    max_bytes: Option<usize>,
}

impl LimitArgs {
    /// Defaults, then the config file, then individual flags.
    fn resolve(&self) -> Result<ReprLimits, DumpError> {
        let mut limits = match &self.config {
            Some(path) => ReprLimits::from_path(path)?,
            None => ReprLimits::default(),
        };
        if let Some(v) = self.max_object {
            limits.max_object_chars = v;
        }
        if let Some(v) = self.max_mapping {
            limits.max_mapping_entries = v;
        }
        if let Some(v) = self.max_sequence {
            limits.max_sequence_items = v;
        }
        if let Some(v) = self.max_text {
            limits.max_text_chars = v;
        }
        if let Some(v) = self.max_bytes {
            limits.max_bytes = v;
        }
        limits.validate()?;
        Ok(limits)
    }
}

/// Errors surfaced by the CLI
#[derive(Debug, Error)]
enum CliError {
    #[error("failed to open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON document: {0}")]
    InvalidDocument(#[source] serde_json::Error),
    #[error(transparent)]
    Dump(#[from] DumpError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Dump {
            input,
            output,
            ndjson,
            limits,
        } => handle_dump(input.as_deref(), output.as_deref(), ndjson, &limits),
        Commands::Limits { limits } => handle_limits(&limits),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match input {
        None => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) if path == Path::new("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn handle_dump(
    input: Option<&Path>,
    output: Option<&Path>,
    ndjson: bool,
    limit_args: &LimitArgs,
) -> Result<(), CliError> {
    let options = DumpOptions::with_limits(limit_args.resolve()?);
    let mut reader = open_input(input)?;
    let mut writer = open_output(output)?;

    if ndjson {
        let mut dumped = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(&line).map_err(|source| {
                CliError::InvalidLine {
                    line: idx + 1,
                    source,
                }
            })?;
            dump_to(&mut writer, &value, &options)?;
            dumped += 1;
        }
        tracing::debug!(records = dumped, "dumped NDJSON input");
    } else {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let value: Value = serde_json::from_str(&text).map_err(CliError::InvalidDocument)?;
        tracing::debug!(bytes = text.len(), "parsed JSON document");
        dump_to(&mut writer, &value, &options)?;
    }

    writer.flush()?;
    Ok(())
}

fn handle_limits(limit_args: &LimitArgs) -> Result<(), CliError> {
    let limits = limit_args.resolve()?;
    let text = limits.to_toml_string()?;
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = LimitArgs {
            max_text: Some(12),
            max_sequence: Some(3),
            ..LimitArgs::default()
        };
        let limits = args.resolve().unwrap();
        assert_eq!(limits.max_text_chars, 12);
        assert_eq!(limits.max_sequence_items, 3);
        assert_eq!(limits.max_bytes, ReprLimits::default().max_bytes);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_text_chars = 5\nmax_bytes = 9").unwrap();
        let args = LimitArgs {
            config: Some(file.path().to_path_buf()),
            max_text: Some(40),
            ..LimitArgs::default()
        };
        let limits = args.resolve().unwrap();
        assert_eq!(limits.max_text_chars, 40);
        assert_eq!(limits.max_bytes, 9);
    }

    #[test]
    fn test_zero_flag_rejected() {
        let args = LimitArgs {
            max_mapping: Some(0),
            ..LimitArgs::default()
        };
        assert!(matches!(args.resolve(), Err(DumpError::InvalidLimits(_))));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    proptest! {
        #[test]
        fn positive_flags_always_resolve(text in 1usize..1_000_000, items in 1usize..1_000_000) {
            let args = LimitArgs {
                max_text: Some(text),
                max_sequence: Some(items),
                ..LimitArgs::default()
            };
            let limits = args.resolve().unwrap();
            prop_assert_eq!(limits.max_text_chars, text);
            prop_assert_eq!(limits.max_sequence_items, items);
        }
    }
}
