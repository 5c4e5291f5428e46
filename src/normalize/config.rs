use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Failed to read cleaner config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse cleaner config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Drop and substitution patterns for each cleaned column
///
/// Substitutions are `[pattern, replacement]` pairs and are applied in the
/// order they are listed. Every section is optional.
///
/// ```json
/// {
///   "name_drops": ["\\bthermal\\b"],
///   "name_substitutions": [["\\bii\\b", "2"]],
///   "province_substitutions": [["\\bhcmc\\b", "tp ho chi minh"]]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub name_drops: Vec<String>,
    pub name_substitutions: Vec<(String, String)>,
    pub province_substitutions: Vec<(String, String)>,
    pub fuel_substitutions: Vec<(String, String)>,
    pub status_substitutions: Vec<(String, String)>,
}

impl CleanerConfig {
    /// Load the embedded default rules
    ///
    /// # Errors
    ///
    /// Returns `CleanerError::Parse` if the embedded JSON is malformed, which
    /// `build.rs` rules out at compile time.
    pub fn load_embedded() -> Result<Self, CleanerError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CONFIG: &str = include_str!("../../config/cleaner.json");
        Self::from_json(EMBEDDED_CONFIG)
    }

    /// Load rules from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CleanerError::Read` if the file cannot be read or
    /// `CleanerError::Parse` if it is not a valid config.
    pub fn load_from_file(path: &Path) -> Result<Self, CleanerError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), "Cleaning patterns loaded");
        Ok(config)
    }

    /// Parse rules from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `CleanerError::Parse` if the JSON does not describe a config.
    pub fn from_json(json: &str) -> Result<Self, CleanerError> {
        Ok(serde_json::from_str(json)?)
    }
}
