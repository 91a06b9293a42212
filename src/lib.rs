//! Volleyball head-to-head game builder
//!
//! Rebuilds two-sided game records from per-team schedule logs, pairing each
//! team's pre-game rolling stats with its opponent's and the game outcome.

pub mod data;
pub mod matching;
pub mod pipeline;
pub mod table;

pub use data::{LogMap, LogStore, ScheduleLog, ScheduleRow};
pub use pipeline::{build_from_logs, build_head_to_head, build_with_report, BuildReport};
pub use table::{HeadToHeadTable, MissingPolicy};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide errors
#[derive(Debug, Error)]
pub enum VolleyballError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{log} is missing required column '{column}'")]
    MissingColumn { log: String, column: String },

    #[error("{0} is empty")]
    EmptyLog(String),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, VolleyballError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory searched recursively for `*.csv` schedule logs
    pub schedules_dir: String,
    /// Where `build` writes the table
    pub output_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            schedules_dir: "all_schedules".to_string(),
            output_path: "head2head.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Drop games with any missing rolling stat
    #[serde(default)]
    pub drop_missing: bool,
    /// Replace missing rolling stats with zero
    #[serde(default)]
    pub fill_missing: bool,
}

impl BuildConfig {
    pub fn policy(&self) -> Result<MissingPolicy> {
        MissingPolicy::from_flags(self.drop_missing, self.fill_missing)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VolleyballError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| VolleyballError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VolleyballError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.build.fill_missing = true;
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.build.policy().unwrap(), MissingPolicy::Fill);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[build]\ndrop_missing = true\n").unwrap();
        assert_eq!(config.data.schedules_dir, "all_schedules");
        assert_eq!(config.build.policy().unwrap(), MissingPolicy::Drop);
    }

    #[test]
    fn test_conflicting_config_policy() {
        let config: Config =
            toml::from_str("[build]\ndrop_missing = true\nfill_missing = true\n").unwrap();
        assert!(matches!(
            config.build.policy(),
            Err(VolleyballError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            Config::load("/no/such/config.toml"),
            Err(VolleyballError::Config(_))
        ));
    }

    #[test]
    fn test_csv_error_message_has_single_prefix() {
        let csv_err = csv::ReaderBuilder::new()
            .from_reader("a,b\n1,2,3\n".as_bytes())
            .records()
            .next()
            .unwrap()
            .unwrap_err();
        let message = VolleyballError::from(csv_err).to_string();
        assert_eq!(message.matches("CSV error").count(), 1);
    }
}
