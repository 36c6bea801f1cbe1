//! Representation limits and configuration

use crate::error::{DumpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum displayed size per kind of value
///
/// Limits are passed to the renderer explicitly; there is no process-wide
/// setting. The defaults are large enough that ordinary debugging output is
/// never truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReprLimits {
    /// Maximum characters of an opaque object's representation (default: 100,000,000)
    pub max_object_chars: usize,
    /// Maximum entries rendered per mapping (default: 100,000,000)
    pub max_mapping_entries: usize,
    /// Maximum elements rendered per sequence (default: 100,000,000)
    pub max_sequence_items: usize,
    /// Maximum characters rendered per text value (default: 500,000,000)
    pub max_text_chars: usize,
    /// Maximum bytes rendered per byte string (default: 100,000,000)
    pub max_bytes: usize,
}

impl Default for ReprLimits {
    fn default() -> Self {
        Self {
            max_object_chars: 100_000_000,
            max_mapping_entries: 100_000_000,
            max_sequence_items: 100_000_000,
            max_text_chars: 500_000_000,
            max_bytes: 100_000_000,
        }
    }
}

impl ReprLimits {
    /// Check that every limit allows at least one unit of output
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("max_object_chars", self.max_object_chars),
            ("max_mapping_entries", self.max_mapping_entries),
            ("max_sequence_items", self.max_sequence_items),
            ("max_text_chars", self.max_text_chars),
            ("max_bytes", self.max_bytes),
        ];
        for (name, limit) in checks {
            if limit == 0 {
                return Err(DumpError::InvalidLimits(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Parse limits from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let limits: ReprLimits = toml::from_str(text)?;
        limits.validate()?;
        Ok(limits)
    }

    /// Load limits from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize the limits as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| DumpError::InvalidLimits(e.to_string()))
    }
}
