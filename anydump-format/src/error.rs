//! Error types for anydump

use thiserror::Error;

/// anydump error types
///
/// Member introspection failures are not represented here: they are captured
/// as [`crate::MemberError`] data inside the dumped tree and never escape.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Writing the rendered tree failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A representation limit was configured with an unusable value.
    #[error("Invalid limits: {0}")]
    InvalidLimits(String),
    /// A limits configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DumpError>;
