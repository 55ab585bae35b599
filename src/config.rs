//! Configuration for hindsight
//!
//! Hold window, progress cadence and report settings. Loaded from the
//! environment (with `.env` support) or from a TOML file.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::graph::HoldWindow;

// ============================================
// REPORT FORMAT
// ============================================

/// How the trade report is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One human-readable line per trade
    #[default]
    Text,

    /// A single JSON document
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "TEXT"),
            ReportFormat::Json => write!(f, "JSON"),
        }
    }
}

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== Hold Window ==========
    /// Shortest allowed hold in minutes
    pub min_hold_minutes: usize,

    /// Longest allowed hold in minutes
    pub max_hold_minutes: usize,

    // ========== Progress ==========
    /// Report graph construction progress every N source minutes (0 = off)
    pub progress_interval: usize,

    // ========== Report ==========
    /// Decimal places for profits in the text report
    pub report_precision: usize,

    /// Write the report here instead of the console
    pub report_path: Option<String>,

    pub report_format: ReportFormat,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            min_hold_minutes: env_or("MIN_HOLD_MINUTES", defaults.min_hold_minutes),
            max_hold_minutes: env_or("MAX_HOLD_MINUTES", defaults.max_hold_minutes),
            progress_interval: env_or("PROGRESS_INTERVAL", defaults.progress_interval),
            report_precision: env_or("REPORT_PRECISION", defaults.report_precision),
            report_path: env::var("REPORT_PATH").ok().filter(|p| !p.is_empty()),
            report_format: match env::var("REPORT_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => ReportFormat::Json,
                _ => ReportFormat::Text,
            },
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn hold_window(&self) -> HoldWindow {
        HoldWindow::new(self.min_hold_minutes, self.max_hold_minutes)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_hold_minutes == 0 {
            return Err(eyre::eyre!(
                "MIN_HOLD_MINUTES must be at least 1 - a trade cannot open and close in the same minute"
            ));
        }
        if self.max_hold_minutes < self.min_hold_minutes {
            return Err(eyre::eyre!(
                "MAX_HOLD_MINUTES ({}) is below MIN_HOLD_MINUTES ({})",
                self.max_hold_minutes,
                self.min_hold_minutes
            ));
        }
        if self.report_precision > 12 {
            return Err(eyre::eyre!(
                "REPORT_PRECISION above 12 digits is noise (currently {})",
                self.report_precision
            ));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let destination = self.report_path.as_deref().unwrap_or("console");
        let progress = if self.progress_interval == 0 {
            "off".to_string()
        } else {
            format!("every {} min", self.progress_interval)
        };

        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║                 HINDSIGHT - CONFIGURATION                  ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ HOLD WINDOW                                                ║");
        println!("║ • Min Hold:        {:>36} min ║", self.min_hold_minutes);
        println!("║ • Max Hold:        {:>36} min ║", self.max_hold_minutes);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ REPORT                                                     ║");
        println!("║ • Format:          {:^40} ║", self.report_format);
        println!("║ • Destination:     {:^40} ║", destination);
        println!("║ • Precision:       {:^40} ║", self.report_precision);
        println!("║ • Progress:        {:^40} ║", progress);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        let window = HoldWindow::default();
        Self {
            min_hold_minutes: window.min,
            max_hold_minutes: window.max,
            progress_interval: 100,
            report_precision: 4,
            report_path: None,
            report_format: ReportFormat::Text,
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hold_window(), HoldWindow::new(30, 59));
        assert_eq!(config.report_format, ReportFormat::Text);
        assert!(config.report_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_window() {
        let config = Config {
            min_hold_minutes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            min_hold_minutes: 40,
            max_hold_minutes: 39,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("below MIN_HOLD_MINUTES"));

        let config = Config {
            report_precision: 20,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hindsight.toml");

        let config = Config {
            max_hold_minutes: 45,
            report_path: Some("trades.txt".to_string()),
            report_format: ReportFormat::Json,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "report_format = \"json\"\n").unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.report_format, ReportFormat::Json);
        assert_eq!(loaded.min_hold_minutes, 30);
        assert_eq!(loaded.progress_interval, 100);
    }

    #[test]
    fn test_env_or_falls_back() {
        env::set_var("HINDSIGHT_TEST_GOOD_VALUE", " 17 ");
        env::set_var("HINDSIGHT_TEST_BAD_VALUE", "seventeen");

        assert_eq!(env_or("HINDSIGHT_TEST_GOOD_VALUE", 3usize), 17);
        assert_eq!(env_or("HINDSIGHT_TEST_BAD_VALUE", 3usize), 3);
        assert_eq!(env_or("HINDSIGHT_TEST_UNSET_VALUE", 3usize), 3);
    }
}
