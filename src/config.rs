// ⚙️ Store Configuration - Settings as Data
// Loaded from a JSON file, every field defaulted, env vars override.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Env var overriding `ledger_path`
pub const ENV_LEDGER: &str = "RECORD_STORE_LEDGER";

/// Env var overriding `partial_pairs` (`reject` or `drop`)
pub const ENV_PARTIAL_PAIRS: &str = "RECORD_STORE_PARTIAL_PAIRS";

/// Day-month-year, the only date layout the ledger reads or writes
pub const LEDGER_DATE_FORMAT: &str = "%d-%m-%Y";

// ============================================================================
// PARTIAL PAIR POLICY
// ============================================================================

/// What the dispatcher does with an input carrying only half of a
/// discriminating field pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartialPairPolicy {
    /// Keep it out of the result and report it as rejected
    #[default]
    Reject,

    /// Keep it out of the result without a report entry
    Drop,
}

impl PartialPairPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "reject" => Some(PartialPairPolicy::Reject),
            "drop" => Some(PartialPairPolicy::Drop),
            _ => None,
        }
    }
}

// ============================================================================
// STORE CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Delimited car ledger file
    pub ledger_path: PathBuf,

    /// Field delimiter of the ledger (single byte)
    pub delimiter: char,

    pub partial_pairs: PartialPairPolicy,

    /// Youngest accepted person age
    pub min_age: u32,

    /// Shortest accepted customer phone
    pub min_phone_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            ledger_path: PathBuf::from("autos.csv"),
            delimiter: ',',
            partial_pairs: PartialPairPolicy::Reject,
            min_age: 15,
            min_phone_len: 8,
        }
    }
}

impl StoreConfig {
    /// Load config from JSON file (missing keys take their defaults)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply RECORD_STORE_* env overrides on top of this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(
            env::var(ENV_LEDGER).ok(),
            env::var(ENV_PARTIAL_PAIRS).ok(),
        )
    }

    fn with_overrides(mut self, ledger: Option<String>, partial: Option<String>) -> Result<Self> {
        if let Some(ledger) = ledger.filter(|v| !v.trim().is_empty()) {
            self.ledger_path = PathBuf::from(ledger);
        }

        if let Some(partial) = partial {
            self.partial_pairs = PartialPairPolicy::parse(&partial).ok_or_else(|| {
                StoreError::Config(format!(
                    "{} must be 'reject' or 'drop', got '{}'",
                    ENV_PARTIAL_PAIRS, partial
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Delimiter as the single byte the csv crate wants
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(StoreError::Config(format!(
                "delimiter must be a single ASCII character other than quote or newline, got {:?}",
                self.delimiter
            )));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();

        assert_eq!(config.ledger_path, PathBuf::from("autos.csv"));
        assert_eq!(config.delimiter_byte(), b',');
        assert_eq!(config.partial_pairs, PartialPairPolicy::Reject);
        assert_eq!(config.min_age, 15);
        assert_eq!(config.min_phone_len, 8);
    }

    #[test]
    fn test_from_file_fills_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{ "ledger_path": "cars.csv", "partial_pairs": "drop" }"#).unwrap();

        let config = StoreConfig::from_file(&path).unwrap();

        assert_eq!(config.ledger_path, PathBuf::from("cars.csv"));
        assert_eq!(config.partial_pairs, PartialPairPolicy::Drop);
        assert_eq!(config.min_age, 15);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = StoreConfig::from_file(dir.path().join("nope.json"));

        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let config = StoreConfig {
            delimiter: 'ß',
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::default()
            .with_overrides(Some("other.csv".to_string()), Some("DROP".to_string()))
            .unwrap();

        assert_eq!(config.ledger_path, PathBuf::from("other.csv"));
        assert_eq!(config.partial_pairs, PartialPairPolicy::Drop);
    }

    #[test]
    fn test_bad_partial_override() {
        let result = StoreConfig::default().with_overrides(None, Some("maybe".to_string()));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
