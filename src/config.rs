// ⚙️ Configuration - JSON file with CLI/env overrides
//
// Every field has a default, so an empty object (or no file at all) is a
// valid configuration.

use crate::pipeline::RunOptions;
use crate::scoring::ScoringPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default check-in file name
pub const DEFAULT_INPUT: &str = "attendance_weekday_500.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Check-in source
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Cap on input lines consumed (unbounded when absent)
    #[serde(default)]
    pub max_records: Option<usize>,

    /// Optional JSON scoring policy; the built-in policy is used otherwise
    #[serde(default)]
    pub policy_file: Option<PathBuf>,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_input() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT)
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input: default_input(),
            max_records: None,
            policy_file: None,
            format: OutputFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// File if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply `ATTENDANCE_INPUT`, `ATTENDANCE_MAX_RECORDS` and
    /// `ATTENDANCE_POLICY` as read through `var`. Binaries without clap use
    /// this to honour the same variables as the CLI.
    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = var("ATTENDANCE_INPUT") {
            self.input = PathBuf::from(input);
        }
        if let Some(max) = var("ATTENDANCE_MAX_RECORDS") {
            let max = max
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid ATTENDANCE_MAX_RECORDS: {:?}", max))?;
            self.max_records = Some(max);
        }
        if let Some(policy) = var("ATTENDANCE_POLICY") {
            self.policy_file = Some(PathBuf::from(policy));
        }
        Ok(())
    }

    pub fn scoring_policy(&self) -> Result<ScoringPolicy> {
        match &self.policy_file {
            Some(path) => ScoringPolicy::from_file(path),
            None => Ok(ScoringPolicy::default()),
        }
    }

    pub fn run_options(&self) -> Result<RunOptions> {
        Ok(RunOptions {
            max_records: self.max_records,
            policy: self.scoring_policy()?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(suffix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("attendance-{}-{}", uuid::Uuid::new_v4(), suffix))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.input, PathBuf::from("attendance_weekday_500.txt"));
        assert_eq!(config.max_records, None);
        assert_eq!(config.policy_file, None);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "max_records": 500, "format": "csv" }"#).unwrap();
        assert_eq!(config.max_records, Some(500));
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
    }

    #[test]
    fn test_load_without_file() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = AppConfig::load(Some(Path::new("./no-such-config.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_run_options_with_policy_file() {
        let policy_path = temp_path("policy.json");
        fs::write(&policy_path, r#"{ "tiers": { "gold": 60, "silver": 35 } }"#).unwrap();

        let config = AppConfig {
            max_records: Some(10),
            policy_file: Some(policy_path.clone()),
            ..AppConfig::default()
        };
        let options = config.run_options().unwrap();
        fs::remove_file(&policy_path).unwrap();

        assert_eq!(options.max_records, Some(10));
        assert_eq!(options.policy.tiers.gold, 60);
        assert_eq!(options.policy.tiers.silver, 35);
    }

    #[test]
    fn test_env_overrides() {
        let vars: std::collections::HashMap<&str, &str> = [
            ("ATTENDANCE_INPUT", "checkins.txt"),
            ("ATTENDANCE_MAX_RECORDS", "500"),
            ("ATTENDANCE_POLICY", "policy.json"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.input, PathBuf::from("checkins.txt"));
        assert_eq!(config.max_records, Some(500));
        assert_eq!(config.policy_file, Some(PathBuf::from("policy.json")));
    }

    #[test]
    fn test_env_overrides_absent_keep_config() {
        let mut config = AppConfig {
            max_records: Some(7),
            ..AppConfig::default()
        };
        config.apply_env_overrides(|_| None).unwrap();
        assert_eq!(config.max_records, Some(7));
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
    }

    #[test]
    fn test_env_overrides_reject_bad_max_records() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(|key| {
                (key == "ATTENDANCE_MAX_RECORDS").then(|| "lots".to_string())
            })
            .unwrap_err();
        assert!(err.to_string().contains("ATTENDANCE_MAX_RECORDS"));
    }

    #[test]
    fn test_bad_policy_file_is_error() {
        let config = AppConfig {
            policy_file: Some(PathBuf::from("./missing-policy.json")),
            ..AppConfig::default()
        };
        assert!(config.run_options().is_err());
    }
}
