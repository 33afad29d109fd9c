//! Configuration management
//!
//! Compatible with the terminal fleet settings.json format:
//! ```json
//! {
//!   "terminal": { "maxAttempts": 3, "minWithdrawal": 10 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_MIN_WITHDRAWAL: u32 = 10;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    terminal: TerminalSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TerminalSettings {
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    /// Whole currency units
    #[serde(default = "default_min_withdrawal")]
    min_withdrawal: u32,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_min_withdrawal() -> u32 {
    DEFAULT_MIN_WITHDRAWAL
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_withdrawal: DEFAULT_MIN_WITHDRAWAL,
            other: HashMap::new(),
        }
    }
}

/// Teller configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Failed PIN attempts before a card locks
    pub max_attempts: u32,
    /// Smallest amount a withdrawal may request
    pub min_withdrawal: Decimal,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_withdrawal: Decimal::from(DEFAULT_MIN_WITHDRAWAL),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the teller directory
    ///
    /// Values can be overridden via the TELLER_MAX_ATTEMPTS and
    /// TELLER_MIN_WITHDRAWAL environment variables (for CI/testing).
    pub fn load(teller_dir: &Path) -> Result<Self> {
        let settings_path = teller_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let max_attempts = std::env::var("TELLER_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(raw.terminal.max_attempts);
        let min_withdrawal = std::env::var("TELLER_MIN_WITHDRAWAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(raw.terminal.min_withdrawal);

        Ok(Self {
            max_attempts,
            min_withdrawal: Decimal::from(min_withdrawal),
            _raw_settings: raw,
        })
    }

    /// Save config to the teller directory
    /// Preserves settings this crate doesn't manage
    pub fn save(&self, teller_dir: &Path) -> Result<()> {
        let settings_path = teller_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.terminal.max_attempts = self.max_attempts;
        settings.terminal.min_withdrawal = self
            .min_withdrawal
            .to_u32()
            .unwrap_or(DEFAULT_MIN_WITHDRAWAL);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.min_withdrawal, Decimal::from(10));
    }

    #[test]
    fn test_load_from_settings_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "terminal": { "maxAttempts": 5, "minWithdrawal": 20 } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.min_withdrawal, Decimal::from(20));
    }

    #[test]
    fn test_save_preserves_unmanaged_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "terminal": { "maxAttempts": 5 }, "branding": { "name": "MockBank" } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.max_attempts = 4;
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["terminal"]["maxAttempts"], 4);
        assert_eq!(value["branding"]["name"], "MockBank");
    }
}
